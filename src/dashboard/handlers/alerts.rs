//! Alert CRUD handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use log::debug;
use serde_json::json;

use super::super::state::DashboardState;
use super::super::types::{ListQuery, NewAlertRequest, StatusUpdateRequest};
use crate::error_handling::AlertError;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AlertError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AlertError::BadRequest(rejection.body_text()))
}

fn alert_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, AlertError> {
    path.map(|Path(id)| id)
        .map_err(|_| AlertError::BadRequest("Invalid alert ID".to_string()))
}

/// `POST /api/alerts` and `POST /api/emergency/alert`
pub async fn create_alert(
    State(state): State<DashboardState>,
    payload: Result<Json<NewAlertRequest>, JsonRejection>,
) -> Result<Response, AlertError> {
    let new_alert = body(payload)?.validate()?;
    let alert = state.store.create(new_alert);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Emergency alert created successfully",
            "alertId": alert.id,
            "alert": alert,
        })),
    )
        .into_response())
}

/// `GET /api/alerts`
pub async fn list_alerts(
    State(state): State<DashboardState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, AlertError> {
    let Query(query) = query.map_err(|rejection| AlertError::BadRequest(rejection.body_text()))?;
    let page = state.store.list(&query);
    debug!(
        "Listing page {} ({} of {} alerts)",
        page.pagination.current, page.pagination.count, page.pagination.total_alerts
    );

    Ok(Json(json!({
        "success": true,
        "alerts": page.alerts,
        "pagination": page.pagination,
        "stats": page.stats,
    }))
    .into_response())
}

/// `GET /api/alerts/stats`
pub async fn stats_handler(State(state): State<DashboardState>) -> Response {
    Json(json!({
        "success": true,
        "stats": state.store.stats(),
        "timestamp": Utc::now(),
    }))
    .into_response()
}

/// `GET /api/alerts/{id}`
pub async fn get_alert(
    State(state): State<DashboardState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Response, AlertError> {
    let id = alert_id(path)?;
    let alert = state.store.get(id).ok_or(AlertError::NotFound(id))?;
    Ok(Json(json!({ "success": true, "alert": alert })).into_response())
}

/// `PATCH /api/alerts/{id}/status`
pub async fn update_status(
    State(state): State<DashboardState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Response, AlertError> {
    let id = alert_id(path)?;
    let update = body(payload)?.validate()?;
    let alert = state.store.update_status(id, update)?;

    Ok(Json(json!({
        "success": true,
        "message": "Alert status updated",
        "alert": alert,
    }))
    .into_response())
}
