//! Serialized access to a tracker from concurrent producers.
//!
//! The tracker mutates its region list in place, so it is moved into a single
//! task that drains a command queue one entry at a time. A sample is fully
//! evaluated against every region before the next command is read.

use log::{debug, info};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::tracker::{GeofenceTracker, TrackedRegion};
use super::types::{Position, RegionReached};
use crate::config::{SESSION_EVENT_CAPACITY, SESSION_QUEUE_DEPTH};
use crate::error_handling::{GeofenceError, SessionError};

enum SessionCommand {
    AddRegion {
        name: String,
        reply: oneshot::Sender<Result<usize, GeofenceError>>,
    },
    RemoveRegion {
        index: usize,
        reply: oneshot::Sender<Result<TrackedRegion, GeofenceError>>,
    },
    Sample {
        position: Position,
        reply: oneshot::Sender<Vec<RegionReached>>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<TrackedRegion>>,
    },
}

/// Owner task of a [`GeofenceTracker`].
pub struct TrackingSession;

impl TrackingSession {
    /// Moves `tracker` into a new task and returns the handle used to drive it.
    ///
    /// Must be called from within a Tokio runtime. The task ends when
    /// [`SessionHandle::stop`] is called or every handle is dropped; the
    /// tracker and its region state are dropped with it.
    pub fn spawn(tracker: GeofenceTracker) -> (SessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(SESSION_QUEUE_DEPTH);
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_session(tracker, rx, events.clone(), cancel.clone()));

        (SessionHandle { tx, events, cancel }, task)
    }
}

async fn run_session(
    mut tracker: GeofenceTracker,
    mut rx: mpsc::Receiver<SessionCommand>,
    events: broadcast::Sender<RegionReached>,
    cancel: CancellationToken,
) {
    debug!("Tracking session started");
    let mut samples = 0usize;

    loop {
        let command = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            command = rx.recv() => match command {
                Some(command) => command,
                None => break,
            },
        };

        // A dropped reply receiver means the caller gave up; the state change stands.
        match command {
            SessionCommand::AddRegion { name, reply } => {
                let _ = reply.send(tracker.add_region(&name));
            }
            SessionCommand::RemoveRegion { index, reply } => {
                let _ = reply.send(tracker.remove_region(index));
            }
            SessionCommand::Sample { position, reply } => {
                samples += 1;
                let reached = tracker.on_position_sample(&position);
                for event in &reached {
                    // No subscribers is fine
                    let _ = events.send(event.clone());
                }
                let _ = reply.send(reached);
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(tracker.regions().to_vec());
            }
        }
    }

    info!(
        "Tracking session ended after {} sample(s), {}/{} region(s) visited",
        samples,
        tracker.visited_count(),
        tracker.len()
    );
}

/// Cloneable front end of a running [`TrackingSession`].
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
    events: broadcast::Sender<RegionReached>,
    cancel: CancellationToken,
}

impl SessionHandle {
    pub async fn add_region(&self, name: &str) -> Result<usize, SessionError> {
        let result = self
            .request(|reply| SessionCommand::AddRegion {
                name: name.to_string(),
                reply,
            })
            .await?;
        Ok(result?)
    }

    pub async fn remove_region(&self, index: usize) -> Result<TrackedRegion, SessionError> {
        let result = self
            .request(|reply| SessionCommand::RemoveRegion { index, reply })
            .await?;
        Ok(result?)
    }

    /// Queues a sample and waits for the events it produced.
    pub async fn submit(&self, position: Position) -> Result<Vec<RegionReached>, SessionError> {
        self.request(|reply| SessionCommand::Sample { position, reply })
            .await
    }

    /// Copy of the active set as of the time the request is processed.
    pub async fn snapshot(&self) -> Result<Vec<TrackedRegion>, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Receives every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RegionReached> {
        self.events.subscribe()
    }

    /// Ends the session. Pending and later requests fail with `SessionError::Closed`.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        if self.cancel.is_cancelled() {
            return Err(SessionError::Closed);
        }
        let (reply, response) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }
}
