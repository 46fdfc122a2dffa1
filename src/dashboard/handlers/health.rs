use axum::{extract::State, response::IntoResponse, response::Response, Json};
use chrono::Utc;
use serde_json::json;

use super::super::state::DashboardState;
use crate::config::SERVICE_NAME;

/// `GET /api/health`
pub async fn health_handler(State(state): State<DashboardState>) -> Response {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "service": SERVICE_NAME,
        "alertsCount": state.store.len(),
    }))
    .into_response()
}
