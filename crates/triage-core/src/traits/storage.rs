// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket store trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::TriageError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Agent, CannedResponse, Customer, NewCustomer, NewTicket, Ticket, TicketFilter,
    TicketRecord, TicketStatus,
};

/// Persistence for customers, tickets, agents, and canned responses.
///
/// Reads return `Ok(None)` for a missing row. Updates addressed to a
/// missing ticket return [`TriageError::NotFound`]. The store does not
/// classify messages and does not deduplicate customers; both are the
/// caller's responsibility.
///
/// Listing and search results are ordered by urgency score descending,
/// then creation time descending.
#[async_trait]
pub trait TicketStore: PluginAdapter {
    /// Initializes the backend (connection, migrations, reference data).
    async fn initialize(&self) -> Result<(), TriageError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), TriageError>;

    // --- Customers ---

    /// Inserts a customer and returns its id.
    ///
    /// A duplicate email yields [`TriageError::Conflict`].
    async fn create_customer(&self, customer: &NewCustomer) -> Result<i64, TriageError>;

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, TriageError>;

    async fn get_customer_by_email(&self, email: &str) -> Result<Option<Customer>, TriageError>;

    /// All customers ordered by name.
    async fn list_customers(&self) -> Result<Vec<Customer>, TriageError>;

    // --- Tickets ---

    /// Inserts a ticket with status `new` and returns its id.
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<i64, TriageError>;

    /// Reads one ticket joined with customer and agent display fields.
    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, TriageError>;

    /// Lists tickets matching every supplied filter, in queue order.
    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TriageError>;

    /// Sets the assignee and forces status to `in-progress`.
    async fn assign_ticket(&self, id: i64, agent_id: i64) -> Result<(), TriageError>;

    /// Records a response, forces status to `resolved`, and overwrites the
    /// assignee with `agent_id`.
    async fn record_response(
        &self,
        id: i64,
        response_text: &str,
        agent_id: Option<i64>,
        responded_at: &str,
    ) -> Result<(), TriageError>;

    /// Overrides the status regardless of assignment or response state.
    async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<(), TriageError>;

    /// A customer's tickets, newest first.
    async fn tickets_for_customer(&self, customer_id: i64)
    -> Result<Vec<TicketRecord>, TriageError>;

    /// Case-insensitive substring search over message body, customer name,
    /// and customer email, in queue order.
    async fn search_tickets(&self, query: &str) -> Result<Vec<Ticket>, TriageError>;

    // --- Reference data ---

    /// Active agents ordered by name.
    async fn list_active_agents(&self) -> Result<Vec<Agent>, TriageError>;

    async fn get_agent(&self, id: i64) -> Result<Option<Agent>, TriageError>;

    /// Canned responses ordered by category, then title.
    async fn list_canned_responses(&self) -> Result<Vec<CannedResponse>, TriageError>;
}
