// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification broadcaster for the Triage support desk.
//!
//! Every successful ticket mutation is published as a [`TicketEvent`] to
//! all currently registered observers. Delivery is best effort: each
//! observer owns a bounded queue, a full queue drops the event for that
//! observer, and late observers are never backfilled.

pub mod bus;
pub mod events;

pub use bus::{EventBus, Subscription};
pub use events::TicketEvent;
