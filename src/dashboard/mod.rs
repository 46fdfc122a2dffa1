//! Emergency alert dashboard.
//!
//! An in-memory alert board served over HTTP:
//! - `/api/alerts` - create and list alerts (`/api/emergency/alert` is an alias for creation)
//! - `/api/alerts/{id}` and `/api/alerts/{id}/status` - read and update one alert
//! - `/api/alerts/stats` - aggregate counters
//! - `/api/alerts/stream` - server-sent events for every change
//! - `/api/health` and `/metrics` - liveness and Prometheus metrics

mod handlers;
mod state;
mod store;
pub mod types;

use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::config::DashboardConfig;
use handlers::{
    create_alert, get_alert, health_handler, list_alerts, metrics_handler, not_found,
    stats_handler, stream_handler, update_status,
};
pub use state::DashboardState;
pub use store::AlertStore;

/// Builds the dashboard router.
pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/alerts", post(create_alert).get(list_alerts))
        .route("/api/emergency/alert", post(create_alert))
        .route("/api/alerts/stats", get(stats_handler))
        .route("/api/alerts/stream", get(stream_handler))
        .route("/api/alerts/{id}", get(get_alert))
        .route("/api/alerts/{id}/status", patch(update_status))
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the dashboard on an already bound listener until `state.shutdown` is cancelled.
pub async fn serve(listener: TcpListener, state: DashboardState) -> Result<(), anyhow::Error> {
    let shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Dashboard server error: {}", e))?;

    log::info!("Dashboard server stopped");
    Ok(())
}

/// Binds the configured address and serves the dashboard.
pub async fn start_dashboard(
    config: &DashboardConfig,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind dashboard to {}: {}", addr, e))?;

    log::info!("🚨 Emergency Dashboard running on http://{}/", addr);
    log::info!("  - Alerts API: http://{}/api/alerts", addr);
    log::info!("  - Live events: http://{}/api/alerts/stream", addr);
    log::info!("  - Metrics: http://{}/metrics", addr);

    let state = DashboardState::new(std::sync::Arc::new(AlertStore::new()), shutdown);
    serve(listener, state).await
}
