// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the store, service, broadcaster, and gateway.
//!
//! Record field names follow the persisted column names so that the JSON
//! emitted to clients matches the table layout (`message_text`,
//! `urgency_level`, `customer_name`, ...).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Broadcaster,
}

/// Customer account class. Informational only.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CustomerTier {
    #[default]
    Standard,
    Premium,
    Gold,
}

/// Urgency classification derived from keyword scoring.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UrgencyLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Ticket lifecycle status: `new` -> `in-progress` -> `resolved`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TicketStatus {
    #[default]
    New,
    InProgress,
    Resolved,
}

/// A customer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub tier: CustomerTier,
    pub account_balance: f64,
    pub created_at: String,
}

/// Values for inserting a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub tier: CustomerTier,
    pub account_balance: f64,
    pub created_at: String,
}

/// A ticket row without joined display fields.
///
/// `urgency_level` and `urgency_score` are written once at creation and
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: i64,
    pub customer_id: i64,
    pub message_text: String,
    pub urgency_level: UrgencyLevel,
    pub urgency_score: u32,
    pub status: TicketStatus,
    pub assigned_to: Option<i64>,
    pub response_text: Option<String>,
    pub responded_at: Option<String>,
    pub created_at: String,
}

/// A ticket joined with its customer and assigned agent display fields.
///
/// This is the payload of every read endpoint and every broadcast event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(flatten)]
    pub record: TicketRecord,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_tier: CustomerTier,
    pub account_balance: f64,
    pub agent_name: Option<String>,
}

impl Ticket {
    pub fn id(&self) -> i64 {
        self.record.id
    }
}

/// Values for inserting a ticket. Urgency must already be computed.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub customer_id: i64,
    pub message_text: String,
    pub urgency_level: UrgencyLevel,
    pub urgency_score: u32,
    pub created_at: String,
}

/// A support agent. Seeded reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub active: bool,
    pub created_at: String,
}

/// A reusable reply template. Seeded reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannedResponse {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub message_template: String,
    pub created_at: String,
}

/// A customer together with their ticket history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerHistory {
    #[serde(flatten)]
    pub customer: Customer,
    pub messages: Vec<TicketRecord>,
}

/// Conjunctive filter for queue listing. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub urgency: Option<UrgencyLevel>,
    pub assigned_to: Option<i64>,
    /// Only tickets with no assigned agent.
    pub unassigned: bool,
}

impl TicketFilter {
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_urgency(mut self, urgency: UrgencyLevel) -> Self {
        self.urgency = Some(urgency);
        self
    }

    pub fn with_assigned_to(mut self, agent_id: i64) -> Self {
        self.assigned_to = Some(agent_id);
        self
    }

    pub fn unassigned_only(mut self) -> Self {
        self.unassigned = true;
        self
    }
}
