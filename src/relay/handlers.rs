//! Relay HTTP handlers.

use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use strum::IntoEnumIterator;
use url::Url;

use super::forward::forward_alert;
use crate::error_handling::{ForwardOutcome, ForwardStats};

/// Shared state of the relay server
#[derive(Clone)]
pub struct RelayState {
    pub client: Arc<reqwest::Client>,
    pub dashboard_url: Arc<Url>,
    pub forward_retries: usize,
    pub stats: Arc<ForwardStats>,
    pub start_time: Arc<Instant>,
}

fn bad_request(error: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": error })),
    )
        .into_response()
}

/// `POST /trigger-alert` and `POST /api/emergency/alert`
pub async fn trigger_alert(
    State(state): State<RelayState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload @ Value::Object(_))) => payload,
        Ok(_) => return bad_request("Alert payload must be a JSON object"),
        Err(rejection) => return bad_request(&rejection.body_text()),
    };

    log::info!("🚨 Alert received from app, forwarding to {}", state.dashboard_url);

    match forward_alert(
        &state.client,
        &state.dashboard_url,
        &payload,
        state.forward_retries,
        &state.stats,
    )
    .await
    {
        Ok(receipt) => {
            state.stats.increment(ForwardOutcome::Forwarded);
            log::info!(
                "Alert forwarded to dashboard after {} attempt(s)",
                receipt.attempts
            );

            let mut body = json!({
                "success": true,
                "message": "Alert successfully sent to dashboard system.",
            });
            if let Some(alert_id) = receipt.alert_id {
                body["alertId"] = alert_id;
            }
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            state.stats.increment(ForwardOutcome::from(&e));
            log::error!("Failed to forward alert to dashboard: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Could not process the alert." })),
            )
                .into_response()
        }
    }
}

/// `GET /health`
pub async fn health_handler(State(state): State<RelayState>) -> Response {
    Json(json!({
        "status": "OK",
        "dashboard": state.dashboard_url.as_str(),
    }))
    .into_response()
}

/// Prometheus-compatible metrics endpoint
pub async fn metrics_handler(State(state): State<RelayState>) -> Response {
    let mut metrics = format!(
        r#"# HELP wayguard_relay_requests_total Alerts handled by the relay
# TYPE wayguard_relay_requests_total counter
wayguard_relay_requests_total {}

# HELP wayguard_relay_uptime_seconds Seconds since the relay started
# TYPE wayguard_relay_uptime_seconds gauge
wayguard_relay_uptime_seconds {}

# HELP wayguard_relay_outcomes_total Forwarding outcomes by kind
# TYPE wayguard_relay_outcomes_total counter
"#,
        state.stats.total_requests(),
        state.start_time.elapsed().as_secs_f64(),
    );

    for outcome in ForwardOutcome::iter() {
        let _ = writeln!(
            metrics,
            "wayguard_relay_outcomes_total{{outcome=\"{}\"}} {}",
            outcome.label(),
            state.stats.get(outcome)
        );
    }

    (StatusCode::OK, metrics).into_response()
}

/// Fallback for every unknown route.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Route not found" })),
    )
        .into_response()
}
