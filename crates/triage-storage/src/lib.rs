// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Triage support desk.
//!
//! Provides WAL-mode SQLite storage with embedded migrations and seeded
//! reference data, a single-writer concurrency model via `tokio-rusqlite`,
//! and typed queries for customers, tickets, agents, and canned responses.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use models::*;
