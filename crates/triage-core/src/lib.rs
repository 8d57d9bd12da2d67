// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Triage support desk.
//!
//! This crate provides the domain types, the error taxonomy, and the
//! adapter traits used throughout the Triage workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TriageError;
pub use types::{
    AdapterType, Agent, CannedResponse, Customer, CustomerHistory, CustomerTier, HealthStatus,
    NewCustomer, NewTicket, Ticket, TicketFilter, TicketRecord, TicketStatus, UrgencyLevel,
};

pub use traits::{PluginAdapter, TicketStore};

/// Persisted timestamp format: millisecond precision with a `Z` suffix,
/// so lexical order equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current UTC time in the persisted timestamp format.
pub fn timestamp_now() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
