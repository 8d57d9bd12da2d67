// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent lookups. Agents are seeded reference data; there is no write path.

use rusqlite::params;
use triage_core::TriageError;

use crate::database::Database;
use crate::models::Agent;

fn row_to_agent(row: &rusqlite::Row<'_>) -> rusqlite::Result<Agent> {
    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        active: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// List active agents ordered by name.
pub async fn list_active_agents(db: &Database) -> Result<Vec<Agent>, TriageError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, active, created_at
                 FROM agents WHERE active = 1 ORDER BY name",
            )?;
            let rows = stmt.query_map([], row_to_agent)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an agent by id, active or not.
pub async fn get_agent(db: &Database, id: i64) -> Result<Option<Agent>, TriageError> {
    db.connection()
        .call(move |conn| {
            match conn.query_row(
                "SELECT id, name, email, active, created_at FROM agents WHERE id = ?1",
                params![id],
                row_to_agent,
            ) {
                Ok(agent) => Ok(Some(agent)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
