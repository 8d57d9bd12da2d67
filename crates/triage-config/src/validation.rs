// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::TriageConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &TriageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.observer_buffer == 0 {
        errors.push(ConfigError::Validation {
            message: "server.observer_buffer must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let level = config.app.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` must be one of: {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
