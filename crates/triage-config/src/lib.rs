// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Triage support desk.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `TRIAGE_*` environment variable overrides, and
//! miette diagnostic rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use triage_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::TriageConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// On a Figment error, the TOML sources are re-read so diagnostics can
/// point at the offending key.
pub fn load_and_validate() -> Result<TriageConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<TriageConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<TriageConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<TriageConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<TriageConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Render a configuration as pretty TOML in the shape `triage.toml` accepts.
pub fn to_toml_string(config: &TriageConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG_FILE) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = Path::new(loader::SYSTEM_CONFIG_PATH);
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}
