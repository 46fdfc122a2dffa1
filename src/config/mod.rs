//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (radii, ports, limits, timeouts)
//! - Library configuration structs for each entry point
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command, DashboardArgs, RelayArgs, TrackArgs};
pub use constants::*;
pub use types::{DashboardConfig, LogFormat, LogLevel, RelayConfig, TrackConfig};
