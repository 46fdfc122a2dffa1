//! Configuration types.
//!
//! This module defines the enums and structs used by the library entry points.
//! They carry no CLI dependency beyond `ValueEnum` and can be built
//! programmatically.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_DASHBOARD_ALERTS_URL, DEFAULT_DASHBOARD_PORT,
    DEFAULT_FORWARD_RETRIES, DEFAULT_RELAY_PORT, FORWARD_TIMEOUT_SECS,
};

/// Verbosity of the `wayguard` log targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log line layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Colored, one line per record, for terminals
    Plain,
    /// One JSON object per record, for log shippers
    Json,
}

/// Settings of the alert dashboard backend.
///
/// # Examples
///
/// ```no_run
/// use wayguard::DashboardConfig;
///
/// let config = DashboardConfig {
///     port: 0,
///     ..Default::default()
/// };
/// assert_eq!(config.socket_addr().port(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Address to bind
    pub bind: IpAddr,
    /// Port to bind (0 picks a free port)
    pub port: u16,
}

impl DashboardConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR,
            port: DEFAULT_DASHBOARD_PORT,
        }
    }
}

/// Settings of the app relay that forwards mobile alerts to the dashboard.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address to bind
    pub bind: IpAddr,
    /// Port to bind (0 picks a free port)
    pub port: u16,
    /// Full URL of the dashboard's alert-creation endpoint
    pub dashboard_url: String,
    /// Forwarding timeout in seconds
    pub timeout_seconds: u64,
    /// Retries after a connection failure
    pub forward_retries: usize,
}

impl RelayConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR,
            port: DEFAULT_RELAY_PORT,
            dashboard_url: DEFAULT_DASHBOARD_ALERTS_URL.to_string(),
            timeout_seconds: FORWARD_TIMEOUT_SECS,
            forward_retries: DEFAULT_FORWARD_RETRIES,
        }
    }
}

/// Settings of a position-feed replay.
#[derive(Debug, Clone, Default)]
pub struct TrackConfig {
    /// JSON-lines feed; `None` reads stdin
    pub input: Option<PathBuf>,
    /// Region catalog JSON; `None` uses the built-in catalog
    pub catalog: Option<PathBuf>,
    /// Region names to watch, in order
    pub regions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_maps_onto_filter_order() {
        let filters: Vec<log::LevelFilter> = LogLevel::value_variants()
            .iter()
            .map(|&level| level.into())
            .collect();
        assert_eq!(
            filters,
            vec![
                log::LevelFilter::Error,
                log::LevelFilter::Warn,
                log::LevelFilter::Info,
                log::LevelFilter::Debug,
                log::LevelFilter::Trace,
            ]
        );
    }

    #[test]
    fn test_log_values_parse_case_insensitively() {
        assert_eq!(LogLevel::from_str("WARN", true), Ok(LogLevel::Warn));
        assert_eq!(LogFormat::from_str("json", false), Ok(LogFormat::Json));
        assert!(LogFormat::from_str("xml", true).is_err());
    }

    #[test]
    fn test_relay_default_points_at_local_dashboard() {
        let config = RelayConfig::default();
        assert_eq!(config.dashboard_url, DEFAULT_DASHBOARD_ALERTS_URL);
        assert_eq!(config.port, DEFAULT_RELAY_PORT);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.forward_retries, 2);
    }

    #[test]
    fn test_socket_addr_uses_bind_and_port() {
        let config = DashboardConfig {
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }
}
