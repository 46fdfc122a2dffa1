//! Server-sent event stream of dashboard changes.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use log::{info, warn};
use tokio::sync::broadcast::{self, error::RecvError};

use super::super::state::DashboardState;
use super::super::types::DashboardEvent;
use crate::config::SSE_KEEP_ALIVE;

/// Owns a listener's receiver and logs when the client goes away.
struct Listener {
    rx: broadcast::Receiver<DashboardEvent>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        info!("📡 Dashboard listener disconnected");
    }
}

fn to_event(event: &DashboardEvent) -> Result<Event, Infallible> {
    let data = serde_json::to_string(event).unwrap_or_default();
    Ok(Event::default().data(data))
}

/// `GET /api/alerts/stream`
///
/// Sends a `connected` event with the current alert count, then every event
/// published after the subscription. A listener that falls behind skips the
/// events it missed.
pub async fn stream_handler(
    State(state): State<DashboardState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.store.subscribe();
    info!(
        "📡 Dashboard listener connected ({} total)",
        state.store.listener_count()
    );

    let connected = DashboardEvent::Connected {
        alerts_count: state.store.len(),
    };
    let first = stream::once(async move { to_event(&connected) });

    let updates = stream::unfold(Listener { rx }, |mut listener| async move {
        loop {
            match listener.rx.recv().await {
                Ok(event) => return Some((to_event(&event), listener)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Dashboard listener lagged, skipped {} event(s)", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let events = first
        .chain(updates)
        .take_until(state.shutdown.cancelled_owned());

    Sse::new(events).keep_alive(KeepAlive::new().interval(SSE_KEEP_ALIVE))
}
