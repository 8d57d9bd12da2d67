// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage serve` implementation.
//!
//! Opens the store, builds the bus and service, serves the gateway until
//! a shutdown signal arrives, then checkpoints and closes the store.

use std::sync::Arc;

use tracing::{error, info};

use triage_bus::EventBus;
use triage_config::TriageConfig;
use triage_core::{TicketStore, TriageError};
use triage_gateway::{GatewayState, ServerConfig, start_server};
use triage_service::TicketService;
use triage_storage::SqliteStorage;

use crate::shutdown;

/// Open the configured SQLite store.
pub async fn open_storage(config: &TriageConfig) -> Result<Arc<SqliteStorage>, TriageError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage ready");
    Ok(Arc::new(storage))
}

/// Runs the server until SIGINT/SIGTERM.
pub async fn run_serve(config: TriageConfig) -> Result<(), TriageError> {
    info!(name = %config.app.name, version = env!("CARGO_PKG_VERSION"), "starting triage");

    let storage = open_storage(&config).await?;
    let bus = Arc::new(EventBus::new(config.server.observer_buffer));
    let store: Arc<dyn TicketStore> = storage.clone();
    let service = TicketService::new(store, Arc::clone(&bus));

    let cancel = shutdown::install_signal_handler();
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let served = start_server(&server_config, GatewayState::new(service), cancel).await;
    if let Err(e) = &served {
        error!(error = %e, "gateway stopped with an error");
    }

    storage.close().await?;
    info!("triage stopped");
    served
}
