// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the `/api` routes.
//!
//! Request bodies use camelCase keys; response records are the store's
//! snake_case rows.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use triage_core::{
    Agent, CannedResponse, Customer, CustomerHistory, CustomerTier, HealthStatus, Ticket,
    TicketFilter, TicketStatus, TriageError, UrgencyLevel,
};
use triage_service::{SubmitMessage, parse_field};

use crate::error::ApiError;
use crate::server::GatewayState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Request body for `POST /api/messages`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub message_text: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub account_balance: Option<f64>,
}

impl SubmitRequest {
    fn into_submission(self) -> Result<SubmitMessage, TriageError> {
        let tier = match self.tier.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_field::<CustomerTier>("tier", raw)?),
        };
        Ok(SubmitMessage {
            customer_name: self.customer_name,
            customer_email: self.customer_email.unwrap_or_default(),
            message_text: self.message_text.unwrap_or_default(),
            tier,
            account_balance: self.account_balance,
        })
    }
}

/// Request body for `POST /api/messages/{id}/assign`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(default)]
    pub agent_id: Option<i64>,
}

/// Request body for `POST /api/messages/{id}/respond`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    #[serde(default)]
    pub response_text: Option<String>,
    #[serde(default)]
    pub agent_id: Option<i64>,
}

/// Request body for `PATCH /api/messages/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// Query parameters for `GET /api/messages`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub urgency: Option<String>,
    pub assigned_to: Option<String>,
    pub unassigned: Option<String>,
}

impl ListQuery {
    pub fn to_filter(&self) -> Result<TicketFilter, TriageError> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        let mut filter = TicketFilter::default();
        if let Some(status) = present(&self.status) {
            filter = filter.with_status(parse_field::<TicketStatus>("status", status)?);
        }
        if let Some(urgency) = present(&self.urgency) {
            filter = filter.with_urgency(parse_field::<UrgencyLevel>("urgency", urgency)?);
        }
        if let Some(agent) = present(&self.assigned_to) {
            filter = filter.with_assigned_to(parse_field::<i64>("assignedTo", agent)?);
        }
        if present(&self.unassigned) == Some("true") {
            filter = filter.unassigned_only();
        }
        Ok(filter)
    }
}

/// Query parameters for `GET /api/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Response body for `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_secs: u64,
    pub observers: usize,
}

/// GET /api/messages
pub async fn list_messages(
    State(state): State<GatewayState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Ticket>> {
    let filter = query.to_filter()?;
    Ok(Json(state.service.list_tickets(&filter).await?))
}

/// GET /api/messages/{id}
pub async fn get_message(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> ApiResult<Ticket> {
    Ok(Json(state.service.get_ticket(id).await?))
}

/// POST /api/messages
///
/// Responds `201 Created` with the joined record.
pub async fn create_message(
    State(state): State<GatewayState>,
    Json(body): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let submission = body.into_submission()?;
    let ticket = state.service.submit_message(submission).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// POST /api/messages/{id}/assign
pub async fn assign_message(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<AssignRequest>,
) -> ApiResult<Ticket> {
    let agent_id = body
        .agent_id
        .ok_or_else(|| TriageError::Validation("Agent ID is required".to_string()))?;
    Ok(Json(state.service.assign(id, agent_id).await?))
}

/// POST /api/messages/{id}/respond
pub async fn respond_message(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<RespondRequest>,
) -> ApiResult<Ticket> {
    let text = body.response_text.unwrap_or_default();
    Ok(Json(state.service.respond(id, &text, body.agent_id).await?))
}

/// PATCH /api/messages/{id}/status
pub async fn update_status(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<StatusRequest>,
) -> ApiResult<Ticket> {
    let raw = body
        .status
        .ok_or_else(|| TriageError::Validation("Status is required".to_string()))?;
    let status = parse_field::<TicketStatus>("status", &raw)?;
    Ok(Json(state.service.set_status(id, status).await?))
}

/// GET /api/customers
pub async fn list_customers(State(state): State<GatewayState>) -> ApiResult<Vec<Customer>> {
    Ok(Json(state.service.list_customers().await?))
}

/// GET /api/customers/{id}
pub async fn get_customer(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> ApiResult<CustomerHistory> {
    Ok(Json(state.service.customer_history(id).await?))
}

/// GET /api/agents
pub async fn list_agents(State(state): State<GatewayState>) -> ApiResult<Vec<Agent>> {
    Ok(Json(state.service.list_agents().await?))
}

/// GET /api/canned-responses
pub async fn list_canned_responses(
    State(state): State<GatewayState>,
) -> ApiResult<Vec<CannedResponse>> {
    Ok(Json(state.service.canned_responses().await?))
}

/// GET /api/search?q=
pub async fn search(
    State(state): State<GatewayState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Ticket>> {
    let q = query.q.unwrap_or_default();
    Ok(Json(state.service.search(&q).await?))
}

/// GET /api/health
///
/// 200 while the store answers its probe, 503 otherwise.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (code, status) = match state.service.store().health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "ok"),
        Ok(HealthStatus::Degraded(reason)) => {
            tracing::warn!(%reason, "storage degraded");
            (StatusCode::OK, "degraded")
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            tracing::error!(%reason, "storage unhealthy");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
        Err(e) => {
            tracing::error!(error = %e, "storage health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        timestamp: triage_core::timestamp_now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        observers: state.service.bus().observer_count(),
    };
    (code, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map)).unwrap()
    }

    #[test]
    fn empty_query_values_are_absent() {
        let filter = query(&[("status", ""), ("urgency", " "), ("assignedTo", "")])
            .to_filter()
            .unwrap();
        assert_eq!(filter, TicketFilter::default());
    }

    #[test]
    fn query_values_build_a_conjunctive_filter() {
        let filter = query(&[
            ("status", "new"),
            ("urgency", "high"),
            ("assignedTo", "3"),
            ("unassigned", "true"),
        ])
        .to_filter()
        .unwrap();
        assert_eq!(filter.status, Some(TicketStatus::New));
        assert_eq!(filter.urgency, Some(UrgencyLevel::High));
        assert_eq!(filter.assigned_to, Some(3));
        assert!(filter.unassigned);
    }

    #[test]
    fn unassigned_only_applies_when_true() {
        let filter = query(&[("unassigned", "false")]).to_filter().unwrap();
        assert!(!filter.unassigned);
    }

    #[test]
    fn bad_query_values_are_validation_errors() {
        for pairs in [[("status", "closed")], [("urgency", "extreme")], [("assignedTo", "bob")]] {
            assert!(matches!(
                query(&pairs).to_filter(),
                Err(TriageError::Validation(_))
            ));
        }
    }

    #[test]
    fn submit_request_reads_camel_case() {
        let body: SubmitRequest = serde_json::from_str(
            r#"{"customerName":"Ada","customerEmail":"ada@x.io","messageText":"hi","tier":"gold","accountBalance":12.5}"#,
        )
        .unwrap();
        let submission = body.into_submission().unwrap();
        assert_eq!(submission.customer_name.as_deref(), Some("Ada"));
        assert_eq!(submission.customer_email, "ada@x.io");
        assert_eq!(submission.tier, Some(CustomerTier::Gold));
        assert_eq!(submission.account_balance, Some(12.5));
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let body = SubmitRequest {
            tier: Some("diamond".into()),
            ..SubmitRequest::default()
        };
        assert!(matches!(
            body.into_submission(),
            Err(TriageError::Validation(_))
        ));
    }
}
