//! Health endpoint

use crate::api::server::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Liveness plus the effective configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub webhooks: usize,
    pub filter_tags: Vec<String>,
    pub poll_interval: u64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        webhooks: state.config.webhook_urls.len(),
        filter_tags: state.config.filter_tags.clone(),
        poll_interval: state.config.poll_interval_seconds,
    })
}
