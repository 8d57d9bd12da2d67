// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, shared state, and graceful shutdown.

use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use triage_core::{PluginAdapter, TriageError};
use triage_service::TicketService;

use crate::handlers;
use crate::ws;

/// Process state reported by the health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub service: TicketService,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(service: TicketService) -> Self {
        Self {
            service,
            health: HealthState::default(),
        }
    }
}

/// Bind address for the gateway (mirrors `[server]` in triage-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the application router.
///
/// - `/api/messages`, `/api/messages/{id}` and its `assign`, `respond`,
///   `status` sub-resources
/// - `/api/customers`, `/api/customers/{id}`, `/api/agents`,
///   `/api/canned-responses`, `/api/search`, `/api/health`
/// - `/ws` for observers
pub fn build_router(state: GatewayState) -> Router {
    let api_routes = Router::new()
        .route(
            "/messages",
            get(handlers::list_messages).post(handlers::create_message),
        )
        .route("/messages/{id}", get(handlers::get_message))
        .route("/messages/{id}/assign", post(handlers::assign_message))
        .route("/messages/{id}/respond", post(handlers::respond_message))
        .route(
            "/messages/{id}/status",
            axum::routing::patch(handlers::update_status),
        )
        .route("/customers", get(handlers::list_customers))
        .route("/customers/{id}", get(handlers::get_customer))
        .route("/agents", get(handlers::list_agents))
        .route("/canned-responses", get(handlers::list_canned_responses))
        .route("/search", get(handlers::search))
        .route("/health", get(handlers::get_health));

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the gateway until `shutdown` is cancelled.
///
/// On cancellation the observer registry is cleared first so open sockets
/// close, then in-flight requests drain.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), TriageError> {
    let bus = std::sync::Arc::clone(state.service.bus());
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TriageError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            if let Err(e) = bus.shutdown().await {
                tracing::warn!(error = %e, "observer registry shutdown failed");
            }
            tracing::info!("gateway draining connections");
        })
        .await
        .map_err(|e| TriageError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }

    #[test]
    fn health_state_starts_now() {
        let health = HealthState::default();
        assert!(health.start_time.elapsed().as_secs() < 5);
    }
}
