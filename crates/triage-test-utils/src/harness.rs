// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use triage_bus::EventBus;
use triage_config::TriageConfig;
use triage_core::{Ticket, TicketStore, TriageError};
use triage_gateway::{GatewayState, build_router};
use triage_service::{SubmitMessage, TicketService};
use triage_storage::SqliteStorage;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    observer_buffer: usize,
    wal_mode: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let defaults = TriageConfig::default();
        Self {
            observer_buffer: defaults.server.observer_buffer,
            wal_mode: defaults.storage.wal_mode,
        }
    }

    /// Per-observer queue capacity.
    pub fn with_observer_buffer(mut self, buffer: usize) -> Self {
        self.observer_buffer = buffer;
        self
    }

    pub fn with_wal_mode(mut self, wal_mode: bool) -> Self {
        self.wal_mode = wal_mode;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, TriageError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| TriageError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = TriageConfig::default();
        config.storage.database_path = db_path.to_string_lossy().to_string();
        config.storage.wal_mode = self.wal_mode;
        config.server.observer_buffer = self.observer_buffer;

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let storage: Arc<dyn TicketStore> = Arc::new(storage);

        let bus = Arc::new(EventBus::new(config.server.observer_buffer));
        let service = TicketService::new(Arc::clone(&storage), Arc::clone(&bus));
        tracing::debug!(path = %db_path.display(), "test harness ready");

        Ok(TestHarness {
            config,
            storage,
            bus,
            service,
            db_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete Triage stack on a throwaway database.
///
/// The database is deleted when the harness is dropped.
pub struct TestHarness {
    pub config: TriageConfig,
    pub storage: Arc<dyn TicketStore>,
    pub bus: Arc<EventBus>,
    pub service: TicketService,
    db_path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Router over this harness's service, as served by `triage serve`.
    pub fn router(&self) -> Router {
        build_router(GatewayState::new(self.service.clone()))
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Submit a message through the service.
    pub async fn submit(&self, email: &str, text: &str) -> Result<Ticket, TriageError> {
        self.service
            .submit_message(SubmitMessage::new(email, text))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_full_stack() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert!(harness.db_path().exists());
        assert_eq!(harness.service.list_agents().await.unwrap().len(), 4);

        let ticket = harness.submit("ada@example.com", "hello").await.unwrap();
        assert_eq!(ticket.customer_email, "ada@example.com");
    }

    #[tokio::test]
    async fn builder_options_apply() {
        let harness = TestHarness::builder()
            .with_observer_buffer(2)
            .with_wal_mode(false)
            .build()
            .await
            .unwrap();
        assert_eq!(harness.config.server.observer_buffer, 2);
        assert!(!harness.config.storage.wal_mode);
    }
}
