// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP and WebSocket request surface for the Triage support desk.
//!
//! REST routes live under `/api` and map one-to-one onto
//! [`TicketService`](triage_service::TicketService) operations. Observers
//! connect to `/ws` and receive every ticket event as a JSON text frame.

pub mod error;
pub mod handlers;
pub mod server;
pub mod ws;

pub use error::ApiError;
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
