//! Error handling and forwarding statistics.
//!
//! This module provides:
//! - Error type definitions for every subsystem
//! - Relay outcome categorization and counters
//! - Retry strategy configuration

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::get_retry_strategy;
pub use stats::ForwardStats;
pub use types::{
    AlertError, CatalogError, FieldError, ForwardOutcome, GeofenceError, InitializationError,
    RelayError, SessionError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_forward_stats_initialization() {
        let stats = ForwardStats::new();
        for outcome in ForwardOutcome::iter() {
            assert_eq!(stats.get(outcome), 0);
        }
        assert_eq!(stats.total_requests(), 0);
    }

    #[test]
    fn test_forward_stats_totals() {
        let stats = ForwardStats::new();
        stats.increment(ForwardOutcome::Forwarded);
        stats.increment(ForwardOutcome::Forwarded);
        stats.increment(ForwardOutcome::Retried);
        stats.increment(ForwardOutcome::ConnectFailed);
        stats.increment(ForwardOutcome::UpstreamRejected);

        assert_eq!(stats.get(ForwardOutcome::Forwarded), 2);
        assert_eq!(stats.total_failures(), 2);
        assert_eq!(stats.total_requests(), 4);
        stats.log_summary();
    }

    #[test]
    fn test_forward_stats_concurrent_increments() {
        let stats = std::sync::Arc::new(ForwardStats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = std::sync::Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment(ForwardOutcome::Timeout);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.get(ForwardOutcome::Timeout), 400);
    }
}
