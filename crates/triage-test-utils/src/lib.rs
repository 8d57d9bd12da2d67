// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Triage integration tests.
//!
//! [`TestHarness`] wires a temp SQLite database, the storage adapter, the
//! event bus, the ticket service, and the axum router exactly as `serve`
//! does, so tests exercise the production stack.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
