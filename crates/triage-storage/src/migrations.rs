// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! `V1` creates the schema and indexes; `V2` seeds agents and canned
//! responses with `INSERT OR IGNORE`, so reopening a populated database
//! never duplicates reference data.

use tracing::debug;
use triage_core::TriageError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations and return how many were applied.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<usize, TriageError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| TriageError::Storage {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        debug!(version = migration.version(), name = migration.name(), "migration applied");
    }
    Ok(report.applied_migrations().len())
}
