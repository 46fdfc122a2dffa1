//! Track run summary.

use log::info;

use crate::geofence::{RegionReached, TrackedRegion};

/// A reached event and the feed line of the sample that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEvent {
    pub line: usize,
    pub reached: RegionReached,
}

/// Results of replaying a position feed.
#[derive(Debug, Clone)]
pub struct TrackReport {
    /// Samples evaluated
    pub samples: usize,
    /// Malformed lines skipped
    pub skipped: usize,
    pub events: Vec<TrackEvent>,
    /// Final state of the watched regions, in watch order
    pub regions: Vec<TrackedRegion>,
    pub elapsed_seconds: f64,
}

impl TrackReport {
    pub fn visited_count(&self) -> usize {
        self.regions.iter().filter(|r| r.is_visited()).count()
    }
}

/// Logs the per-region outcome of a track run.
pub fn log_track_summary(report: &TrackReport) {
    info!(
        "Track summary: {} sample(s), {} skipped, {}/{} region(s) visited",
        report.samples,
        report.skipped,
        report.visited_count(),
        report.regions.len()
    );
    for (index, region) in report.regions.iter().enumerate() {
        let first_line = report
            .events
            .iter()
            .find(|e| e.reached.index == index)
            .map(|e| e.line);
        match first_line {
            Some(line) => info!("   #{} {}: reached at line {}", index, region.name(), line),
            None => info!("   #{} {}: not reached", index, region.name()),
        }
    }
}
