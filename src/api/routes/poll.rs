//! Manual poll trigger

use crate::api::server::AppState;
use crate::types::PollSummary;
use axum::{extract::State, Json};
use tracing::info;

/// POST /poll - run one poll cycle and return its counters
pub async fn trigger_poll(State(state): State<AppState>) -> Json<PollSummary> {
    info!("Manual poll requested");
    Json(state.poller.poll().await)
}
