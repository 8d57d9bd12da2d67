// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types persisted by the storage layer.
//!
//! The canonical definitions live in `triage-core`; they are re-exported
//! here so query modules can `use crate::models::*`.

pub use triage_core::types::{
    Agent, CannedResponse, Customer, NewCustomer, NewTicket, Ticket, TicketFilter, TicketRecord,
};
