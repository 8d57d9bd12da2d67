// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`TicketStore`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use triage_config::model::StorageConfig;
use triage_core::{
    AdapterType, Agent, CannedResponse, Customer, HealthStatus, NewCustomer, NewTicket,
    PluginAdapter, Ticket, TicketFilter, TicketRecord, TicketStatus, TicketStore, TriageError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed ticket store.
///
/// The database is opened lazily by [`TicketStore::initialize`]; every
/// other operation fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a store for the configured path without opening it.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, TriageError> {
        self.db.get().ok_or_else(|| TriageError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        let db = self.db()?;
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await;
        match probe {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => {
                warn!(error = %e, "storage health probe failed");
                Ok(HealthStatus::Unhealthy(e.to_string()))
            }
        }
    }

    async fn shutdown(&self) -> Result<(), TriageError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), TriageError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TriageError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TriageError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Customers ---

    async fn create_customer(&self, customer: &NewCustomer) -> Result<i64, TriageError> {
        queries::customers::create_customer(self.db()?, customer).await
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, TriageError> {
        queries::customers::get_customer(self.db()?, id).await
    }

    async fn get_customer_by_email(&self, email: &str) -> Result<Option<Customer>, TriageError> {
        queries::customers::get_customer_by_email(self.db()?, email).await
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, TriageError> {
        queries::customers::list_customers(self.db()?).await
    }

    // --- Tickets ---

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<i64, TriageError> {
        queries::tickets::create_ticket(self.db()?, ticket).await
    }

    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, TriageError> {
        queries::tickets::get_ticket(self.db()?, id).await
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TriageError> {
        queries::tickets::list_tickets(self.db()?, filter).await
    }

    async fn assign_ticket(&self, id: i64, agent_id: i64) -> Result<(), TriageError> {
        queries::tickets::assign_ticket(self.db()?, id, agent_id).await
    }

    async fn record_response(
        &self,
        id: i64,
        response_text: &str,
        agent_id: Option<i64>,
        responded_at: &str,
    ) -> Result<(), TriageError> {
        queries::tickets::record_response(self.db()?, id, response_text, agent_id, responded_at)
            .await
    }

    async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<(), TriageError> {
        queries::tickets::set_ticket_status(self.db()?, id, status).await
    }

    async fn tickets_for_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<TicketRecord>, TriageError> {
        queries::tickets::tickets_for_customer(self.db()?, customer_id).await
    }

    async fn search_tickets(&self, query: &str) -> Result<Vec<Ticket>, TriageError> {
        queries::tickets::search_tickets(self.db()?, query).await
    }

    // --- Reference data ---

    async fn list_active_agents(&self) -> Result<Vec<Agent>, TriageError> {
        queries::agents::list_active_agents(self.db()?).await
    }

    async fn get_agent(&self, id: i64) -> Result<Option<Agent>, TriageError> {
        queries::agents::get_agent(self.db()?, id).await
    }

    async fn list_canned_responses(&self) -> Result<Vec<CannedResponse>, TriageError> {
        queries::canned_responses::list_canned_responses(self.db()?).await
    }
}
