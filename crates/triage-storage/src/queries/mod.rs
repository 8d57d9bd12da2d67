// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod agents;
pub mod canned_responses;
pub mod customers;
pub mod tickets;

use std::str::FromStr;

/// Read a text column and parse it into one of the kebab-case domain enums.
pub(crate) fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::{TempDir, tempdir};
    use triage_core::{CustomerTier, NewCustomer, NewTicket, UrgencyLevel};

    use crate::database::Database;

    pub async fn setup_db() -> (Database, TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    pub fn make_customer(name: &str, email: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            tier: CustomerTier::Standard,
            account_balance: 0.0,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    pub fn make_ticket(customer_id: i64, text: &str, score: u32, created_at: &str) -> NewTicket {
        let urgency_level = if score >= 15 {
            UrgencyLevel::High
        } else if score >= 5 {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Low
        };
        NewTicket {
            customer_id,
            message_text: text.to_string(),
            urgency_level,
            urgency_score: score,
            created_at: created_at.to_string(),
        }
    }
}
