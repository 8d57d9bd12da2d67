// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./triage.toml` > `~/.config/triage/triage.toml` > `/etc/triage/triage.toml`
//! with environment variable overrides via `TRIAGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TriageConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/triage/triage.toml";

/// Local configuration file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "triage.toml";

/// The per-user configuration file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("triage/triage.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/triage/triage.toml` (system-wide)
/// 3. `~/.config/triage/triage.toml` (user XDG config)
/// 4. `./triage.toml` (local directory)
/// 5. `TRIAGE_*` environment variables
pub fn load_config() -> Result<TriageConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TriageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TriageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TRIAGE_STORAGE_DATABASE_PATH` must become
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("TRIAGE_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config key.
pub fn map_env_key(key: &str) -> String {
    for section in ["app", "server", "storage"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
