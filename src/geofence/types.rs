//! Geofence data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One position fix reported by the location provider.
///
/// Samples are processed in arrival order. The timestamp is informational only:
/// providers occasionally deliver late low-accuracy fixes, so nothing here
/// assumes timestamps are monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Degrees, [-90, 90]
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Degrees, [-180, 180]
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: None,
        }
    }

    pub fn at(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: Some(timestamp),
        }
    }
}

/// Membership state of a tracked region. `Visited` is terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegionState {
    #[default]
    Unvisited,
    Visited,
}

/// Emitted once per tracked region, on its Unvisited -> Visited transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReached {
    /// Position of the region in the active set when the sample was evaluated
    pub index: usize,
    pub name: String,
}
