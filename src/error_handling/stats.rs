//! Forwarding statistics tracking.
//!
//! This module provides thread-safe counters for the outcomes of alerts the
//! relay forwards to the dashboard.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ForwardOutcome;

/// Thread-safe forwarding statistics tracker.
///
/// One atomic counter per [`ForwardOutcome`], all initialized to zero on
/// creation. Share across handlers with `Arc`.
pub struct ForwardStats {
    outcomes: HashMap<ForwardOutcome, AtomicUsize>,
}

impl ForwardStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in ForwardOutcome::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }
        ForwardStats { outcomes }
    }

    /// Increment an outcome counter.
    pub fn increment(&self, outcome: ForwardOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment counter for {:?} which is not in the map. \
                 This indicates a bug in ForwardStats initialization.",
                outcome
            );
        }
    }

    /// Get the count for an outcome.
    pub fn get(&self, outcome: ForwardOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Requests that ended in a failure of any kind.
    pub fn total_failures(&self) -> usize {
        ForwardOutcome::iter()
            .filter(|o| !matches!(o, ForwardOutcome::Forwarded | ForwardOutcome::Retried))
            .map(|o| self.get(o))
            .sum()
    }

    /// Requests handled, successful or not. Retries are not counted.
    pub fn total_requests(&self) -> usize {
        self.get(ForwardOutcome::Forwarded) + self.total_failures()
    }

    /// Logs non-zero counters.
    pub fn log_summary(&self) {
        let total = self.total_requests();
        if total == 0 {
            log::info!("No alerts were relayed");
            return;
        }
        log::info!("Relay outcomes ({} total):", total);
        for outcome in ForwardOutcome::iter() {
            let count = self.get(outcome);
            if count > 0 {
                log::info!("   {}: {}", outcome.as_str(), count);
            }
        }
    }
}

impl Default for ForwardStats {
    fn default() -> Self {
        Self::new()
    }
}
