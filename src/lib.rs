//! wayguard library: geofence tracking and emergency-alert plumbing
//!
//! This library provides the pieces of a travel-safety backend:
//! - A geofence tracker that reports the first entry into each watched region
//! - An in-memory alert dashboard with a live event stream
//! - A relay that forwards mobile alerts to the dashboard
//!
//! # Example
//!
//! ```no_run
//! use wayguard::{run_track, TrackConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrackConfig {
//!     input: Some(std::path::PathBuf::from("positions.jsonl")),
//!     regions: vec!["Park".to_string(), "Museum".to_string()],
//!     ..Default::default()
//! };
//!
//! let report = run_track(config, CancellationToken::new()).await?;
//! println!("{} sample(s), {} region(s) reached", report.samples, report.events.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The servers and the tracking session require a Tokio runtime. The plain
//! [`geofence::GeofenceTracker`] does not.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error_handling;
pub mod geofence;
pub mod initialization;
pub mod relay;
mod run;

// Re-export public API
pub use app::{TrackEvent, TrackReport};
pub use config::{DashboardConfig, LogFormat, LogLevel, RelayConfig, TrackConfig};
pub use run::{run_dashboard, run_relay, run_track};
