// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Triage support desk.

use thiserror::Error;

/// The primary error type used across store, service, and gateway layers.
///
/// Variants follow the request-boundary taxonomy: validation, not-found,
/// conflict, and transient storage failure. Configuration and internal
/// errors never reach a client as anything but a generic server error.
#[derive(Debug, Error)]
pub enum TriageError {
    /// A required field is missing or a value does not parse.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A uniqueness constraint was violated (duplicate customer email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage backend errors (connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TriageError {
    /// Shorthand for a missing ticket.
    pub fn ticket_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "message",
            id,
        }
    }

    /// Shorthand for a missing customer.
    pub fn customer_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "customer",
            id,
        }
    }

    /// Whether this error is caused by the caller rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound { .. } | Self::Conflict(_)
        )
    }
}
