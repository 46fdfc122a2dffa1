//! Dashboard HTTP handlers.

mod alerts;
mod health;
mod metrics;
mod stream;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error_handling::AlertError;

pub use alerts::{create_alert, get_alert, list_alerts, stats_handler, update_status};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use stream::stream_handler;

impl IntoResponse for AlertError {
    fn into_response(self) -> Response {
        match self {
            AlertError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "Validation failed",
                    "details": details,
                })),
            )
                .into_response(),
            AlertError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "error": "Alert not found" })),
            )
                .into_response(),
            AlertError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
        }
    }
}

/// Fallback for every unknown route.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Route not found" })),
    )
        .into_response()
}
