// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All queries are serialized through tokio-rusqlite's single background
//! thread. `Database` wraps that one connection and IS the single writer:
//! query modules accept `&Database` and go through `connection().call()`.
//! Do NOT create additional Connection instances for writes.

use tracing::{debug, info};
use triage_core::TriageError;

use crate::migrations;

/// Milliseconds SQLite waits on a locked database before failing.
const BUSY_TIMEOUT_MS: i64 = 5_000;

/// Handle to the single SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, TriageError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing the journal mode explicitly.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, TriageError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| TriageError::Storage {
                source: Box::new(e),
            })?;

        let journal_mode = if wal_mode { "WAL" } else { "DELETE" };
        let applied: String = conn
            .call(move |conn| {
                let mode: String =
                    conn.pragma_update_and_check(None, "journal_mode", journal_mode, |row| {
                        row.get(0)
                    })?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.pragma_update(None, "foreign_keys", "ON")?;
                conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)?;
                Ok(mode)
            })
            .await
            .map_err(map_tr_err)?;
        debug!(path, journal_mode = %applied, "database pragmas applied");

        let report = conn
            .call(|conn| Ok(migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;
        info!(path, applied = report, "database opened");

        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), TriageError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), TriageError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(|e| TriageError::Storage {
            source: Box::new(e),
        })?;
        debug!("database closed");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into a [`TriageError`].
///
/// Unique-constraint violations become `Conflict`; everything else is a
/// transient `Storage` failure.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TriageError {
    match e {
        tokio_rusqlite::Error::Error(inner) => map_sqlite_err(inner),
        other => TriageError::Storage {
            source: Box::new(other),
        },
    }
}

pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> TriageError {
    match &e {
        rusqlite::Error::SqliteFailure(err, msg)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            TriageError::Conflict(
                msg.clone()
                    .unwrap_or_else(|| "unique constraint violated".to_string()),
            )
        }
        _ => TriageError::Storage {
            source: Box::new(e),
        },
    }
}
