//! Alert relay between the mobile app and the dashboard.
//!
//! Accepts alert payloads on `/trigger-alert` (and `/api/emergency/alert`)
//! and forwards them unchanged to the dashboard's alert endpoint. Only
//! connection failures are retried, so an alert is never delivered twice.

mod forward;
mod handlers;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use url::Url;

use crate::config::RelayConfig;
use crate::error_handling::{ForwardStats, InitializationError};
use crate::initialization::init_forward_client;
use handlers::{health_handler, metrics_handler, not_found, trigger_alert};

pub use forward::{forward_alert, ForwardReceipt};
pub use handlers::RelayState;

impl RelayState {
    /// Parses the dashboard URL and builds the forwarding client.
    pub fn from_config(config: &RelayConfig) -> Result<Self, anyhow::Error> {
        let dashboard_url = Url::parse(&config.dashboard_url)
            .with_context(|| format!("Invalid dashboard URL '{}'", config.dashboard_url))?;
        if !matches!(dashboard_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "Dashboard URL must use http or https: {}",
                config.dashboard_url
            );
        }
        let client = init_forward_client(config).map_err(InitializationError::from)?;

        Ok(Self {
            client,
            dashboard_url: Arc::new(dashboard_url),
            forward_retries: config.forward_retries,
            stats: Arc::new(ForwardStats::new()),
            start_time: Arc::new(Instant::now()),
        })
    }
}

/// Builds the relay router.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/trigger-alert", post(trigger_alert))
        .route("/api/emergency/alert", post(trigger_alert))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the relay on an already bound listener until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: RelayState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    let stats = Arc::clone(&state.stats);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Relay server error: {}", e))?;

    stats.log_summary();
    Ok(())
}

/// Binds the configured address and serves the relay.
pub async fn start_relay(
    config: &RelayConfig,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    let state = RelayState::from_config(config)?;
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind relay to {}: {}", addr, e))?;

    log::info!("📨 Alert relay listening on http://{}/", addr);
    log::info!("  - Trigger: http://{}/trigger-alert", addr);
    log::info!("  - Forwarding to: {}", state.dashboard_url);

    serve(listener, state, shutdown).await
}
