//! Entry points behind the CLI subcommands.

mod track;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::config::{DashboardConfig, RelayConfig};

pub use track::run_track;

/// Runs the alert dashboard until `shutdown` is cancelled.
///
/// # Errors
///
/// Fails if the address cannot be bound or the server stops with an error.
pub async fn run_dashboard(config: DashboardConfig, shutdown: CancellationToken) -> Result<()> {
    log::debug!("Starting dashboard with {:?}", config);
    crate::dashboard::start_dashboard(&config, shutdown).await
}

/// Runs the alert relay until `shutdown` is cancelled.
///
/// # Errors
///
/// Fails if the dashboard URL is invalid, the HTTP client cannot be built,
/// the address cannot be bound, or the server stops with an error.
pub async fn run_relay(config: RelayConfig, shutdown: CancellationToken) -> Result<()> {
    log::debug!("Starting relay with {:?}", config);
    crate::relay::start_relay(&config, shutdown).await
}
