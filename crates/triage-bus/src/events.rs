// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event types carried by the broadcaster.

use serde::{Deserialize, Serialize};
use triage_core::{Ticket, TriageError};

/// A ticket lifecycle event. Both variants carry the fully joined ticket.
///
/// Serialized as `{"event": "<name>", "data": <ticket>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum TicketEvent {
    /// A customer submitted a new message.
    #[serde(rename = "new-message")]
    Created(Ticket),
    /// A ticket was assigned, answered, or had its status overridden.
    #[serde(rename = "message-updated")]
    Updated(Ticket),
}

impl TicketEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created(_) => "new-message",
            Self::Updated(_) => "message-updated",
        }
    }

    pub fn ticket(&self) -> &Ticket {
        match self {
            Self::Created(ticket) | Self::Updated(ticket) => ticket,
        }
    }

    /// Encode as the JSON text frame sent to observers.
    pub fn to_json(&self) -> Result<String, TriageError> {
        serde_json::to_string(self)
            .map_err(|e| TriageError::Internal(format!("failed to encode {}: {e}", self.name())))
    }
}
