//! Geofence tracking.
//!
//! This module provides:
//! - Haversine distance between two coordinates
//! - The region catalog (name -> center and radius)
//! - The tracker that detects first entry into each watched region
//! - A task-backed session that serializes access from concurrent producers
//!
//! # Example
//!
//! ```
//! use wayguard::geofence::{GeofenceTracker, Position, RegionCatalog};
//!
//! let mut tracker = GeofenceTracker::new(RegionCatalog::builtin());
//! tracker.add_region("Park").unwrap();
//!
//! let reached = tracker.on_position_sample(&Position::new(28.6139, 77.2090));
//! assert_eq!(reached[0].name, "Park");
//! assert!(tracker.on_position_sample(&Position::new(28.6139, 77.2090)).is_empty());
//! ```

mod catalog;
mod distance;
mod session;
mod tracker;
mod types;

// Re-export public API
pub use catalog::{RegionCatalog, RegionSpec};
pub use distance::haversine_distance;
pub use session::{SessionHandle, TrackingSession};
pub use tracker::{GeofenceTracker, RegionObserver, TrackedRegion};
pub use types::{Position, RegionReached, RegionState};
