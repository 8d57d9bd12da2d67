// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
///
/// Variants that can be traced back to a TOML file carry the span and
/// source text miette needs to underline the offending key.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(triage::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Key as written in the file.
        key: String,
        /// Closest valid key above the similarity threshold.
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        /// Location of the key in its file, when it could be found.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// File the key was read from.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(triage::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path of the key, e.g. `server.port`.
        key: String,
        /// What was found versus what was expected.
        detail: String,
        /// Expected type, shown as help.
        expected: String,
        /// Location of the key in its file, when it could be found.
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        /// File the value was read from.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(triage::config::missing_key),
        help("add `{key} = <value>` to your triage.toml")
    )]
    MissingKey {
        /// Name of the absent key.
        key: String,
    },

    /// A semantic validation failure.
    #[error("validation error: {message}")]
    #[diagnostic(code(triage::config::validation))]
    Validation {
        /// Which setting failed and why.
        message: String,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(triage::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let (span, src) = find_source_span(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, &valid_keys),
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => {
                let field = error.path.last().cloned().unwrap_or_default();
                let (span, src) = find_source_span(&error, &field, toml_sources);
                ConfigError::InvalidType {
                    key: error.path.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(format!("{error}")),
        })
        .collect()
}

/// Locate the offending key in whichever TOML file the error came from.
fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let source = match source_path {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path),
        // Inline strings have no file metadata; use the only source if unambiguous.
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };

    if let Some((path, content)) = source {
        let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
        if let Some(offset) = find_key_offset(content, &section, field) {
            let span = SourceSpan::new(offset.into(), field.len());
            return (Some(span), Some(NamedSource::new(path, content.clone())));
        }
    }

    (None, None)
}

/// Find the byte offset of `field` in TOML content, after its `[section]` header.
///
/// For top-level fields (empty `path`), searches from the start.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header).map(|pos| pos + header.len())?
        }
    };

    let mut byte_offset = 0;
    for line in content[search_start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field) {
            if after.starts_with([' ', '=', '\t']) {
                let indent = line.len() - trimmed.len();
                return Some(search_start + byte_offset + indent);
            }
        }
        byte_offset += line.len();
    }

    None
}

/// Suggest the closest valid key above the similarity threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render all configuration errors to stderr via miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
