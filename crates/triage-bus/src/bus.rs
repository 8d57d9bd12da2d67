// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide observer registry with bounded per-observer queues.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use triage_core::{AdapterType, HealthStatus, PluginAdapter, TriageError};

use crate::events::TicketEvent;

struct Observer {
    sender: mpsc::Sender<Arc<TicketEvent>>,
    agent_name: Option<String>,
}

/// A registered observer's receiving end.
///
/// Dropping the receiver closes the queue; the next publish unregisters
/// the observer.
pub struct Subscription {
    pub id: String,
    pub receiver: mpsc::Receiver<Arc<TicketEvent>>,
}

/// Fan-out broadcaster for [`TicketEvent`]s.
///
/// `publish` never blocks: it is safe to call from request handlers while
/// slow observers are draining their queues.
pub struct EventBus {
    observers: DashMap<String, Observer>,
    buffer: usize,
}

impl EventBus {
    /// Create a bus whose observers each buffer up to `buffer` events.
    pub fn new(buffer: usize) -> Self {
        Self {
            observers: DashMap::new(),
            buffer: buffer.max(1),
        }
    }

    /// Register a new observer and return its subscription.
    pub fn register(&self) -> Subscription {
        let id = uuid::Uuid::new_v4().to_string();
        let (sender, receiver) = mpsc::channel(self.buffer);
        self.observers.insert(
            id.clone(),
            Observer {
                sender,
                agent_name: None,
            },
        );
        info!(observer_id = %id, observers = self.observers.len(), "observer connected");
        Subscription { id, receiver }
    }

    /// Record the agent name an observer announced. Used for logging only.
    pub fn identify(&self, id: &str, agent_name: &str) -> bool {
        match self.observers.get_mut(id) {
            Some(mut observer) => {
                observer.agent_name = Some(agent_name.to_string());
                info!(observer_id = %id, agent = %agent_name, "agent logged in");
                true
            }
            None => false,
        }
    }

    /// Agent name an observer announced, if any.
    pub fn agent_name(&self, id: &str) -> Option<String> {
        self.observers.get(id).and_then(|o| o.agent_name.clone())
    }

    /// Names announced by connected observers, sorted.
    pub fn identified_agents(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .observers
            .iter()
            .filter_map(|o| o.agent_name.clone())
            .collect();
        names.sort();
        names
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unregister(&self, id: &str) -> bool {
        match self.observers.remove(id) {
            Some((_, observer)) => {
                info!(
                    observer_id = %id,
                    agent = observer.agent_name.as_deref().unwrap_or("-"),
                    observers = self.observers.len(),
                    "observer disconnected"
                );
                true
            }
            None => false,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `event` to every registered observer and return how many
    /// queues accepted it.
    pub fn publish(&self, event: TicketEvent) -> usize {
        let event = Arc::new(event);
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.observers.iter() {
            match entry.sender.try_send(Arc::clone(&event)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        observer_id = %entry.key(),
                        event = event.name(),
                        ticket_id = event.ticket().id(),
                        "observer queue full, dropping event"
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(entry.key().clone()),
            }
        }

        // Removal happens after iteration; DashMap shards are read-locked above.
        for id in closed {
            self.unregister(&id);
        }

        debug!(
            event = event.name(),
            ticket_id = event.ticket().id(),
            delivered,
            "event published"
        );
        delivered
    }
}

#[async_trait]
impl PluginAdapter for EventBus {
    fn name(&self) -> &str {
        "observer-bus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Broadcaster
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        Ok(HealthStatus::Healthy)
    }

    /// Drops every sender so observer receive loops end.
    async fn shutdown(&self) -> Result<(), TriageError> {
        let count = self.observers.len();
        self.observers.clear();
        debug!(count, "observer registry cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{CustomerTier, Ticket, TicketRecord, TicketStatus, UrgencyLevel};

    fn ticket(id: i64) -> Ticket {
        Ticket {
            record: TicketRecord {
                id,
                customer_id: 1,
                message_text: "hello".into(),
                urgency_level: UrgencyLevel::Low,
                urgency_score: 0,
                status: TicketStatus::New,
                assigned_to: None,
                response_text: None,
                responded_at: None,
                created_at: "2026-01-01T00:00:00.000Z".into(),
            },
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            customer_tier: CustomerTier::Standard,
            account_balance: 0.0,
            agent_name: None,
        }
    }

    #[tokio::test]
    async fn every_observer_receives_every_event() {
        let bus = EventBus::new(8);
        let mut a = bus.register();
        let mut b = bus.register();

        assert_eq!(bus.publish(TicketEvent::Created(ticket(1))), 2);
        assert_eq!(bus.publish(TicketEvent::Updated(ticket(1))), 2);

        for sub in [&mut a, &mut b] {
            let first = sub.receiver.recv().await.unwrap();
            assert_eq!(first.name(), "new-message");
            let second = sub.receiver.recv().await.unwrap();
            assert_eq!(second.name(), "message-updated");
        }
    }

    #[tokio::test]
    async fn late_observer_is_not_backfilled() {
        let bus = EventBus::new(8);
        assert_eq!(bus.publish(TicketEvent::Created(ticket(1))), 0);

        let mut late = bus.register();
        assert!(late.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_queue_drops_event_but_keeps_observer() {
        let bus = EventBus::new(1);
        let mut sub = bus.register();

        assert_eq!(bus.publish(TicketEvent::Created(ticket(1))), 1);
        assert_eq!(bus.publish(TicketEvent::Created(ticket(2))), 0);
        assert_eq!(bus.observer_count(), 1);

        assert_eq!(sub.receiver.recv().await.unwrap().ticket().id(), 1);
        assert_eq!(bus.publish(TicketEvent::Created(ticket(3))), 1);
        assert_eq!(sub.receiver.recv().await.unwrap().ticket().id(), 3);
    }

    #[tokio::test]
    async fn dropped_receiver_is_unregistered_on_publish() {
        let bus = EventBus::new(4);
        let keep = bus.register();
        let gone = bus.register();
        drop(gone.receiver);

        assert_eq!(bus.publish(TicketEvent::Created(ticket(1))), 1);
        assert_eq!(bus.observer_count(), 1);
        assert!(bus.unregister(&keep.id));
        assert_eq!(bus.observer_count(), 0);
    }

    #[tokio::test]
    async fn identify_records_agent_name() {
        let bus = EventBus::new(4);
        let sub = bus.register();

        assert!(bus.identify(&sub.id, "Mike Chen"));
        assert_eq!(bus.agent_name(&sub.id).as_deref(), Some("Mike Chen"));
        assert!(!bus.identify("no-such-observer", "Ghost"));
    }

    #[tokio::test]
    async fn identified_agents_skips_anonymous_observers() {
        let bus = EventBus::new(4);
        let sarah = bus.register();
        let _anonymous = bus.register();
        let david = bus.register();
        bus.identify(&sarah.id, "Sarah Johnson");
        bus.identify(&david.id, "David Kim");

        assert_eq!(bus.identified_agents(), vec!["David Kim", "Sarah Johnson"]);
        bus.unregister(&david.id);
        assert_eq!(bus.identified_agents(), vec!["Sarah Johnson"]);
    }

    #[tokio::test]
    async fn shutdown_closes_observer_queues() {
        let bus = EventBus::new(4);
        let mut sub = bus.register();

        bus.shutdown().await.unwrap();
        assert_eq!(bus.observer_count(), 0);
        assert!(sub.receiver.recv().await.is_none());
    }

    #[test]
    fn zero_buffer_is_clamped() {
        let bus = EventBus::new(0);
        let _sub = bus.register();
        assert_eq!(bus.publish(TicketEvent::Created(ticket(1))), 1);
    }
}
