// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed inputs for service operations.

use std::str::FromStr;

use triage_core::{CustomerTier, TriageError};

/// Name given to customers who submit without one.
pub const DEFAULT_CUSTOMER_NAME: &str = "Unknown Customer";

/// Input for [`TicketService::submit_message`](crate::TicketService::submit_message).
///
/// `tier` and `account_balance` only apply when the email is new; an
/// existing customer's record is never updated by a submission.
#[derive(Debug, Clone, Default)]
pub struct SubmitMessage {
    pub customer_name: Option<String>,
    pub customer_email: String,
    pub message_text: String,
    pub tier: Option<CustomerTier>,
    pub account_balance: Option<f64>,
}

impl SubmitMessage {
    pub fn new(customer_email: impl Into<String>, message_text: impl Into<String>) -> Self {
        Self {
            customer_email: customer_email.into(),
            message_text: message_text.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_tier(mut self, tier: CustomerTier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.account_balance = Some(balance);
        self
    }

    /// Check required fields and return the resolved customer name.
    pub(crate) fn validate(&self) -> Result<String, TriageError> {
        if self.customer_email.trim().is_empty() || self.message_text.trim().is_empty() {
            return Err(TriageError::Validation(
                "Customer email and message text are required".to_string(),
            ));
        }
        Ok(self
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER_NAME)
            .to_string())
    }
}

/// Parse an enumerated request value, naming the field on failure.
pub fn parse_field<T: FromStr>(field: &str, value: &str) -> Result<T, TriageError> {
    value
        .trim()
        .parse()
        .map_err(|_| TriageError::Validation(format!("invalid {field}: `{value}`")))
}
