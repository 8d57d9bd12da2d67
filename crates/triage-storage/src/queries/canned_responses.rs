// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned response templates.

use triage_core::TriageError;

use crate::database::Database;
use crate::models::CannedResponse;

/// List all canned responses ordered by category, then title.
pub async fn list_canned_responses(db: &Database) -> Result<Vec<CannedResponse>, TriageError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, category, message_template, created_at
                 FROM canned_responses ORDER BY category, title",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(CannedResponse {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    category: row.get(2)?,
                    message_template: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    #[tokio::test]
    async fn seeded_responses_are_grouped_by_category() {
        let (db, _dir) = setup_db().await;
        let responses = list_canned_responses(&db).await.unwrap();
        let titles: Vec<&str> = responses.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Account Information Update",
                "Document Upload Instructions",
                "General Inquiry Response",
                "Disbursement Timeline",
                "Loan Application Status",
                "Payment Issue Resolution",
            ]
        );
        assert!(
            responses
                .iter()
                .all(|r| !r.message_template.is_empty() && r.category.is_some())
        );
    }
}
