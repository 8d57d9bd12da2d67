// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket service: validation, customer lookup-before-create,
//! classification, lifecycle transitions, and event publication.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use triage_bus::{EventBus, TicketEvent};
use triage_core::{
    Agent, CannedResponse, Customer, CustomerHistory, NewCustomer, NewTicket, Ticket,
    TicketFilter, TicketStatus, TicketStore, TriageError, timestamp_now,
};
use triage_urgency::UrgencyClassifier;

use crate::request::SubmitMessage;

/// Orchestrates the classifier, the store, and the broadcaster.
///
/// Cheap to clone; all state lives behind `Arc`s.
#[derive(Clone)]
pub struct TicketService {
    store: Arc<dyn TicketStore>,
    bus: Arc<EventBus>,
    classifier: UrgencyClassifier,
}

impl TicketService {
    pub fn new(store: Arc<dyn TicketStore>, bus: Arc<EventBus>) -> Self {
        Self {
            store,
            bus,
            classifier: UrgencyClassifier::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn TicketStore> {
        &self.store
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    // --- Mutations ---

    /// Submit a customer message.
    ///
    /// Finds the customer by email or creates one, classifies the text,
    /// persists the ticket, and publishes a `new-message` event.
    #[instrument(skip_all, fields(email = %request.customer_email))]
    pub async fn submit_message(&self, request: SubmitMessage) -> Result<Ticket, TriageError> {
        let customer_name = request.validate()?;
        let email = request.customer_email.trim().to_string();

        let customer_id = self
            .find_or_create_customer(&email, &customer_name, &request)
            .await?;

        let assessment = self.classifier.classify(&request.message_text);
        let id = self
            .store
            .create_ticket(&NewTicket {
                customer_id,
                message_text: request.message_text.clone(),
                urgency_level: assessment.level,
                urgency_score: assessment.score,
                created_at: timestamp_now(),
            })
            .await?;
        info!(
            ticket_id = id,
            customer_id,
            urgency_score = assessment.score,
            urgency = %assessment.level,
            "message submitted"
        );

        let ticket = self.read_back(id).await?;
        self.bus.publish(TicketEvent::Created(ticket.clone()));
        Ok(ticket)
    }

    /// Assign a ticket to an agent; status becomes `in-progress` regardless
    /// of its prior value.
    #[instrument(skip(self))]
    pub async fn assign(&self, id: i64, agent_id: i64) -> Result<Ticket, TriageError> {
        self.get_ticket(id).await?;
        self.require_agent(agent_id).await?;

        self.store.assign_ticket(id, agent_id).await?;
        info!(ticket_id = id, agent_id, "ticket assigned");
        self.publish_update(id).await
    }

    /// Record a response and resolve the ticket.
    ///
    /// The responder becomes the assignee, replacing any prior one; with no
    /// responder the assignee is cleared.
    #[instrument(skip(self, response_text))]
    pub async fn respond(
        &self,
        id: i64,
        response_text: &str,
        agent_id: Option<i64>,
    ) -> Result<Ticket, TriageError> {
        if response_text.trim().is_empty() {
            return Err(TriageError::Validation(
                "Response text is required".to_string(),
            ));
        }
        self.get_ticket(id).await?;
        if let Some(agent_id) = agent_id {
            self.require_agent(agent_id).await?;
        }

        self.store
            .record_response(id, response_text, agent_id, &timestamp_now())
            .await?;
        info!(ticket_id = id, agent_id = ?agent_id, "ticket resolved with response");
        self.publish_update(id).await
    }

    /// Override a ticket's status.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: i64, status: TicketStatus) -> Result<Ticket, TriageError> {
        self.store.set_ticket_status(id, status).await?;
        info!(ticket_id = id, %status, "ticket status set");
        self.publish_update(id).await
    }

    // --- Reads ---

    pub async fn get_ticket(&self, id: i64) -> Result<Ticket, TriageError> {
        self.store
            .get_ticket(id)
            .await?
            .ok_or_else(|| TriageError::ticket_not_found(id))
    }

    pub async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TriageError> {
        self.store.list_tickets(filter).await
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, TriageError> {
        self.store.list_customers().await
    }

    /// A customer with their tickets, newest first.
    pub async fn customer_history(&self, id: i64) -> Result<CustomerHistory, TriageError> {
        let customer = self
            .store
            .get_customer(id)
            .await?
            .ok_or_else(|| TriageError::customer_not_found(id))?;
        let messages = self.store.tickets_for_customer(id).await?;
        Ok(CustomerHistory { customer, messages })
    }

    pub async fn list_agents(&self) -> Result<Vec<Agent>, TriageError> {
        self.store.list_active_agents().await
    }

    pub async fn canned_responses(&self) -> Result<Vec<CannedResponse>, TriageError> {
        self.store.list_canned_responses().await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Ticket>, TriageError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TriageError::Validation(
                "Search query is required".to_string(),
            ));
        }
        self.store.search_tickets(query).await
    }

    // --- Helpers ---

    async fn find_or_create_customer(
        &self,
        email: &str,
        name: &str,
        request: &SubmitMessage,
    ) -> Result<i64, TriageError> {
        if let Some(existing) = self.store.get_customer_by_email(email).await? {
            return Ok(existing.id);
        }

        let new_customer = NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            tier: request.tier.unwrap_or_default(),
            account_balance: request.account_balance.unwrap_or(0.0),
            created_at: timestamp_now(),
        };
        match self.store.create_customer(&new_customer).await {
            Ok(id) => {
                info!(customer_id = id, tier = %new_customer.tier, "customer created");
                Ok(id)
            }
            // A concurrent submission created the same email first.
            Err(TriageError::Conflict(detail)) => {
                warn!(%detail, "customer created concurrently, reusing existing row");
                self.store
                    .get_customer_by_email(email)
                    .await?
                    .map(|c| c.id)
                    .ok_or(TriageError::Conflict(detail))
            }
            Err(e) => Err(e),
        }
    }

    async fn require_agent(&self, agent_id: i64) -> Result<Agent, TriageError> {
        self.store
            .get_agent(agent_id)
            .await?
            .ok_or_else(|| TriageError::Validation(format!("unknown agent {agent_id}")))
    }

    async fn read_back(&self, id: i64) -> Result<Ticket, TriageError> {
        self.store.get_ticket(id).await?.ok_or_else(|| {
            TriageError::Internal(format!("ticket {id} missing immediately after write"))
        })
    }

    async fn publish_update(&self, id: i64) -> Result<Ticket, TriageError> {
        let ticket = self.get_ticket(id).await?;
        let delivered = self.bus.publish(TicketEvent::Updated(ticket.clone()));
        debug!(ticket_id = id, delivered, "update broadcast");
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use triage_config::model::StorageConfig;
    use triage_core::{CustomerTier, UrgencyLevel};
    use triage_storage::SqliteStorage;

    async fn setup() -> (TicketService, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("service.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        let service = TicketService::new(Arc::new(storage), Arc::new(EventBus::new(16)));
        (service, dir)
    }

    #[tokio::test]
    async fn submit_creates_customer_once_per_email() {
        let (service, _dir) = setup().await;

        let first = service
            .submit_message(SubmitMessage::new("ada@example.com", "hello").with_name("Ada"))
            .await
            .unwrap();
        let second = service
            .submit_message(SubmitMessage::new("ada@example.com", "again").with_name("Other"))
            .await
            .unwrap();

        assert_eq!(first.record.customer_id, second.record.customer_id);
        assert_eq!(second.customer_name, "Ada");
        assert_eq!(service.list_customers().await.unwrap().len(), 1);
        assert_eq!(
            service
                .customer_history(first.record.customer_id)
                .await
                .unwrap()
                .messages
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn submit_applies_defaults_and_classification() {
        let (service, _dir) = setup().await;

        let ticket = service
            .submit_message(SubmitMessage::new(
                "x@example.com",
                "URGENT: my account is frozen",
            ))
            .await
            .unwrap();

        assert_eq!(ticket.customer_name, "Unknown Customer");
        assert_eq!(ticket.customer_tier, CustomerTier::Standard);
        assert_eq!(ticket.account_balance, 0.0);
        assert_eq!(ticket.record.urgency_score, 20);
        assert_eq!(ticket.record.urgency_level, UrgencyLevel::High);
        assert_eq!(ticket.record.status, TicketStatus::New);
    }

    #[tokio::test]
    async fn submit_uses_supplied_tier_and_balance_for_new_customers() {
        let (service, _dir) = setup().await;

        let ticket = service
            .submit_message(
                SubmitMessage::new("gold@example.com", "hi")
                    .with_tier(CustomerTier::Gold)
                    .with_balance(5000.5),
            )
            .await
            .unwrap();
        assert_eq!(ticket.customer_tier, CustomerTier::Gold);
        assert_eq!(ticket.account_balance, 5000.5);
    }

    #[tokio::test]
    async fn submit_rejects_missing_fields() {
        let (service, _dir) = setup().await;
        let err = service
            .submit_message(SubmitMessage::new("", "text"))
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::Validation(_)));
        assert!(service.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submit_publishes_created_event() {
        let (service, _dir) = setup().await;
        let mut sub = service.bus().register();

        let ticket = service
            .submit_message(SubmitMessage::new("ada@example.com", "hello"))
            .await
            .unwrap();

        let event = sub.receiver.recv().await.unwrap();
        assert_eq!(*event, TicketEvent::Created(ticket));
    }

    #[tokio::test]
    async fn respond_reassigns_to_responder() {
        let (service, _dir) = setup().await;
        let ticket = service
            .submit_message(SubmitMessage::new("ada@example.com", "help"))
            .await
            .unwrap();

        let assigned = service.assign(ticket.id(), 1).await.unwrap();
        assert_eq!(assigned.record.status, TicketStatus::InProgress);
        assert_eq!(assigned.record.assigned_to, Some(1));

        let resolved = service.respond(ticket.id(), "Fixed", Some(2)).await.unwrap();
        assert_eq!(resolved.record.status, TicketStatus::Resolved);
        assert_eq!(resolved.record.assigned_to, Some(2));
        assert_eq!(resolved.agent_name.as_deref(), Some("Mike Chen"));
        assert!(resolved.record.responded_at.is_some());
    }

    #[tokio::test]
    async fn assign_reopens_resolved_ticket() {
        let (service, _dir) = setup().await;
        let ticket = service
            .submit_message(SubmitMessage::new("ada@example.com", "help"))
            .await
            .unwrap();
        service.respond(ticket.id(), "Done", Some(1)).await.unwrap();

        let reassigned = service.assign(ticket.id(), 3).await.unwrap();
        assert_eq!(reassigned.record.status, TicketStatus::InProgress);
        assert_eq!(reassigned.record.response_text.as_deref(), Some("Done"));
    }

    #[tokio::test]
    async fn mutations_on_missing_ticket_are_not_found() {
        let (service, _dir) = setup().await;
        assert!(matches!(
            service.assign(999, 1).await,
            Err(TriageError::NotFound { id: 999, .. })
        ));
        assert!(matches!(
            service.respond(999, "x", None).await,
            Err(TriageError::NotFound { .. })
        ));
        assert!(matches!(
            service.set_status(999, TicketStatus::Resolved).await,
            Err(TriageError::NotFound { .. })
        ));
        assert!(matches!(
            service.customer_history(999).await,
            Err(TriageError::NotFound { entity: "customer", .. })
        ));
    }

    #[tokio::test]
    async fn unknown_agent_and_blank_response_are_validation_errors() {
        let (service, _dir) = setup().await;
        let ticket = service
            .submit_message(SubmitMessage::new("ada@example.com", "help"))
            .await
            .unwrap();

        assert!(matches!(
            service.assign(ticket.id(), 99).await,
            Err(TriageError::Validation(_))
        ));
        assert!(matches!(
            service.respond(ticket.id(), "  ", Some(1)).await,
            Err(TriageError::Validation(_))
        ));
        assert!(matches!(
            service.respond(ticket.id(), "ok", Some(99)).await,
            Err(TriageError::Validation(_))
        ));
        let unchanged = service.get_ticket(ticket.id()).await.unwrap();
        assert_eq!(unchanged.record.status, TicketStatus::New);
    }

    #[tokio::test]
    async fn updates_publish_message_updated() {
        let (service, _dir) = setup().await;
        let ticket = service
            .submit_message(SubmitMessage::new("ada@example.com", "help"))
            .await
            .unwrap();
        let mut sub = service.bus().register();

        service
            .set_status(ticket.id(), TicketStatus::Resolved)
            .await
            .unwrap();
        let event = sub.receiver.recv().await.unwrap();
        assert_eq!(event.name(), "message-updated");
        assert_eq!(event.ticket().record.status, TicketStatus::Resolved);
    }

    #[tokio::test]
    async fn search_requires_a_query() {
        let (service, _dir) = setup().await;
        service
            .submit_message(SubmitMessage::new("ada@example.com", "loan pending"))
            .await
            .unwrap();

        assert!(matches!(
            service.search("  ").await,
            Err(TriageError::Validation(_))
        ));
        assert_eq!(service.search("LOAN").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reference_data_is_exposed() {
        let (service, _dir) = setup().await;
        assert_eq!(service.list_agents().await.unwrap().len(), 4);
        assert_eq!(service.canned_responses().await.unwrap().len(), 6);
    }
}
