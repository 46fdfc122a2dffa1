//! Geofence tracker.
//!
//! Holds the ordered set of active regions for one tracking session and turns
//! position samples into region-entry events. Each region moves from
//! `Unvisited` to `Visited` at most once, so every region reports its entry
//! exactly once for the lifetime of the tracker.
//!
//! The tracker is a plain single-writer state holder: every operation takes
//! `&mut self` and runs to completion. Hosts with several sample producers
//! should go through [`TrackingSession`](super::TrackingSession).

use std::fmt;

use log::{debug, info};

use super::catalog::{RegionCatalog, RegionSpec};
use super::distance::haversine_distance;
use super::types::{Position, RegionReached, RegionState};
use crate::error_handling::GeofenceError;

/// Receives region-entry events as they are detected.
///
/// Implemented for any `FnMut(&RegionReached) + Send` closure.
pub trait RegionObserver: Send {
    fn region_reached(&mut self, event: &RegionReached);
}

impl<F> RegionObserver for F
where
    F: FnMut(&RegionReached) + Send,
{
    fn region_reached(&mut self, event: &RegionReached) {
        self(event)
    }
}

/// One entry of the active set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedRegion {
    name: String,
    spec: RegionSpec,
    state: RegionState,
}

impl TrackedRegion {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &RegionSpec {
        &self.spec
    }

    pub fn state(&self) -> RegionState {
        self.state
    }

    pub fn is_visited(&self) -> bool {
        self.state == RegionState::Visited
    }

    /// Distance from `position` to this region's center, in meters.
    pub fn distance_from(&self, position: &Position) -> f64 {
        haversine_distance(
            position.latitude,
            position.longitude,
            self.spec.latitude,
            self.spec.longitude,
        )
    }

    /// Boundary inclusive.
    pub fn contains(&self, position: &Position) -> bool {
        self.distance_from(position) <= self.spec.radius
    }
}

/// Visited/unvisited bookkeeping for a set of named circular regions.
pub struct GeofenceTracker {
    catalog: RegionCatalog,
    regions: Vec<TrackedRegion>,
    observer: Option<Box<dyn RegionObserver>>,
}

impl GeofenceTracker {
    pub fn new(catalog: RegionCatalog) -> Self {
        Self {
            catalog,
            regions: Vec::new(),
            observer: None,
        }
    }

    /// Registers the observer that receives every emitted event, replacing
    /// any previous one.
    pub fn with_observer(mut self, observer: impl RegionObserver + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    pub fn set_observer(&mut self, observer: impl RegionObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Appends the catalog region `name` as unvisited and returns its index.
    ///
    /// Duplicate names are accepted; each entry keeps its own visited state.
    ///
    /// # Errors
    ///
    /// `GeofenceError::InvalidRegion` when `name` is not in the catalog. The
    /// active set is left untouched.
    pub fn add_region(&mut self, name: &str) -> Result<usize, GeofenceError> {
        let spec = *self
            .catalog
            .lookup(name)
            .ok_or_else(|| GeofenceError::InvalidRegion {
                name: name.to_string(),
            })?;

        self.regions.push(TrackedRegion {
            name: name.to_string(),
            spec,
            state: RegionState::Unvisited,
        });
        let index = self.regions.len() - 1;
        debug!(
            "Watching region '{}' at index {} ({:.5}, {:.5}, r={}m)",
            name, index, spec.latitude, spec.longitude, spec.radius
        );
        Ok(index)
    }

    /// Removes and returns the entry at `index`; later entries shift down.
    ///
    /// # Errors
    ///
    /// `GeofenceError::Index` when `index` is out of range. No region is affected.
    pub fn remove_region(&mut self, index: usize) -> Result<TrackedRegion, GeofenceError> {
        if index >= self.regions.len() {
            return Err(GeofenceError::Index {
                index,
                len: self.regions.len(),
            });
        }
        let removed = self.regions.remove(index);
        debug!("Stopped watching region '{}' (index {})", removed.name, index);
        Ok(removed)
    }

    /// Evaluates every unvisited region against `position`, in set order.
    ///
    /// Each region the sample falls inside (distance <= radius) becomes
    /// visited and yields one event. Events are passed to the observer, if
    /// any, and returned in the same order.
    pub fn on_position_sample(&mut self, position: &Position) -> Vec<RegionReached> {
        let mut reached = Vec::new();

        for (index, region) in self.regions.iter_mut().enumerate() {
            if region.is_visited() {
                continue;
            }
            if region.contains(position) {
                region.state = RegionState::Visited;
                info!("Region '{}' reached", region.name);
                reached.push(RegionReached {
                    index,
                    name: region.name.clone(),
                });
            }
        }

        if let Some(observer) = self.observer.as_mut() {
            for event in &reached {
                observer.region_reached(event);
            }
        }

        reached
    }

    pub fn regions(&self) -> &[TrackedRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.regions.iter().filter(|r| r.is_visited()).count()
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }
}

impl fmt::Debug for GeofenceTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeofenceTracker")
            .field("catalog", &self.catalog)
            .field("regions", &self.regions)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
