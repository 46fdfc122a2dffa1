//! Position feed replay.

use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::app::{log_track_summary, open_feed, parse_position_line, TrackEvent, TrackReport};
use crate::config::TrackConfig;
use crate::geofence::{GeofenceTracker, RegionCatalog, SessionHandle, TrackingSession};

/// Replays a JSON-lines position feed through a tracking session.
///
/// Every `config.regions` entry is watched, in order, before the first
/// sample is read. Blank lines are ignored and malformed lines are logged
/// and skipped. Cancelling `cancel` stops reading and reports what was
/// processed so far.
///
/// # Errors
///
/// Fails if the catalog cannot be loaded, a region name is not in the
/// catalog, or the feed cannot be opened or read.
pub async fn run_track(config: TrackConfig, cancel: CancellationToken) -> Result<TrackReport> {
    let start_time = Instant::now();

    let catalog = match &config.catalog {
        Some(path) => RegionCatalog::from_json_file(path).context("Failed to load region catalog")?,
        None => RegionCatalog::builtin(),
    };
    info!("Region catalog has {} region(s)", catalog.len());

    let (session, task) = TrackingSession::spawn(GeofenceTracker::new(catalog));
    let result = replay(&config, &session, &cancel).await;

    session.stop();
    if let Err(e) = task.await {
        warn!("Tracking session task failed: {}", e);
    }

    let mut report = result?;
    report.elapsed_seconds = start_time.elapsed().as_secs_f64();
    log_track_summary(&report);
    Ok(report)
}

async fn replay(
    config: &TrackConfig,
    session: &SessionHandle,
    cancel: &CancellationToken,
) -> Result<TrackReport> {
    for name in &config.regions {
        let index = session
            .add_region(name)
            .await
            .with_context(|| format!("Cannot watch region '{}'", name))?;
        info!("Watching region #{} '{}'", index, name);
    }

    let mut lines = open_feed(config.input.as_deref()).await?;
    let mut line_number = 0usize;
    let mut samples = 0usize;
    let mut skipped = 0usize;
    let mut events = Vec::new();

    loop {
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Track interrupted after {} sample(s)", samples);
                break;
            }
            line = lines.next_line() => line.context("Failed to read position feed")?,
        };
        let Some(line) = line else {
            break;
        };
        line_number += 1;

        match parse_position_line(&line) {
            None => continue,
            Some(Err(e)) => {
                warn!("Skipping malformed position on line {}: {}", line_number, e);
                skipped += 1;
            }
            Some(Ok(position)) => {
                samples += 1;
                for reached in session.submit(position).await? {
                    events.push(TrackEvent {
                        line: line_number,
                        reached,
                    });
                }
            }
        }
    }

    let regions = session.snapshot().await?;

    Ok(TrackReport {
        samples,
        skipped,
        events,
        regions,
        elapsed_seconds: 0.0,
    })
}
