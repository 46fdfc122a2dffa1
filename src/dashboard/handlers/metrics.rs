//! Prometheus metrics handler.

use std::fmt::Write;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use strum::IntoEnumIterator;

use super::super::state::DashboardState;
use super::super::types::AlertStatus;

/// Prometheus-compatible metrics endpoint
pub async fn metrics_handler(State(state): State<DashboardState>) -> Response {
    let stats = state.store.stats();
    let elapsed = state.start_time.elapsed().as_secs_f64();

    let mut metrics = format!(
        r#"# HELP wayguard_alerts_created_total Alerts created since start
# TYPE wayguard_alerts_created_total counter
wayguard_alerts_created_total {}

# HELP wayguard_alerts_stored Alerts currently kept in memory
# TYPE wayguard_alerts_stored gauge
wayguard_alerts_stored {}

# HELP wayguard_alerts_last_24h Stored alerts raised in the last 24 hours
# TYPE wayguard_alerts_last_24h gauge
wayguard_alerts_last_24h {}

# HELP wayguard_stream_listeners Connected event stream listeners
# TYPE wayguard_stream_listeners gauge
wayguard_stream_listeners {}

# HELP wayguard_uptime_seconds Seconds since the dashboard started
# TYPE wayguard_uptime_seconds gauge
wayguard_uptime_seconds {}

# HELP wayguard_alerts_by_status Stored alerts per status
# TYPE wayguard_alerts_by_status gauge
"#,
        state.store.created_total(),
        stats.total,
        stats.last24_hours,
        state.store.listener_count(),
        elapsed,
    );

    for status in AlertStatus::iter() {
        let count = match status {
            AlertStatus::Active => stats.active,
            AlertStatus::Acknowledged => stats.acknowledged,
            AlertStatus::Resolved => stats.resolved,
            AlertStatus::Cancelled => stats.cancelled,
        };
        let _ = writeln!(
            metrics,
            "wayguard_alerts_by_status{{status=\"{}\"}} {}",
            status, count
        );
    }

    (StatusCode::OK, metrics).into_response()
}
