// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket orchestration for the Triage support desk.
//!
//! [`TicketService`] combines the urgency classifier, a [`TicketStore`]
//! backend, and the [`EventBus`] broadcaster. Every successful mutation
//! reads the joined ticket back from the store and publishes it.
//!
//! [`TicketStore`]: triage_core::TicketStore
//! [`EventBus`]: triage_bus::EventBus

pub mod request;
pub mod service;

pub use request::{DEFAULT_CUSTOMER_NAME, SubmitMessage, parse_field};
pub use service::TicketService;
