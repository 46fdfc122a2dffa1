//! Shared state of the dashboard server.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use super::store::AlertStore;

/// Handed to every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct DashboardState {
    pub store: Arc<AlertStore>,
    pub start_time: Arc<Instant>,
    /// Cancelled on shutdown; ends open event streams
    pub shutdown: CancellationToken,
}

impl DashboardState {
    pub fn new(store: Arc<AlertStore>, shutdown: CancellationToken) -> Self {
        Self {
            store,
            start_time: Arc::new(Instant::now()),
            shutdown,
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(Arc::new(AlertStore::new()), CancellationToken::new())
    }
}
