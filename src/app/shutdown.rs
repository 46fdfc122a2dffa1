//! Graceful shutdown handling.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` on Ctrl-C.
///
/// The watcher task ends on its own once `cancel` is cancelled elsewhere.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    log::info!("Received Ctrl-C, shutting down");
                    cancel.cancel();
                }
                Err(e) => log::warn!("Failed to listen for Ctrl-C: {}", e),
            },
            _ = cancel.cancelled() => {}
        }
    })
}
