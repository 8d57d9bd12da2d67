// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of service errors into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use triage_core::TriageError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A [`TriageError`] leaving the request boundary.
///
/// Client errors carry their message; everything else is logged and
/// reported as a generic 500.
#[derive(Debug)]
pub struct ApiError(pub TriageError);

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TriageError::Validation(_) => StatusCode::BAD_REQUEST,
            TriageError::NotFound { .. } => StatusCode::NOT_FOUND,
            TriageError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match &self.0 {
            TriageError::Validation(msg) | TriageError::Conflict(msg) => msg.clone(),
            TriageError::NotFound { entity, .. } => format!("{} not found", capitalize(entity)),
            _ => "Internal server error".to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.client_message(),
            }),
        )
            .into_response()
    }
}
