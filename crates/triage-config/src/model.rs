// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Triage configuration.
///
/// All sections are optional and default to values suitable for a local
/// demo deployment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TriageConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// HTTP/WebSocket listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in logs and the health endpoint.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "triage".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP/WebSocket listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-observer event queue depth. Events beyond this are dropped for
    /// that observer only.
    #[serde(default = "default_observer_buffer")]
    pub observer_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            observer_buffer: default_observer_buffer(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_observer_buffer() -> usize {
    64
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "customer_service.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}
