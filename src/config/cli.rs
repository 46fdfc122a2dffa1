//! Command-line interface.
//!
//! The binary parses [`Cli`] and hands the converted library configs to the
//! `run_*` entry points.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_DASHBOARD_ALERTS_URL, DEFAULT_DASHBOARD_PORT,
    DEFAULT_FORWARD_RETRIES, DEFAULT_RELAY_PORT, FORWARD_TIMEOUT_SECS,
};
use crate::config::types::{DashboardConfig, LogFormat, LogLevel, RelayConfig, TrackConfig};

/// Travel-safety backend: geofence tracking and emergency-alert relay.
#[derive(Debug, Parser)]
#[command(name = "wayguard", version, about)]
pub struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the alert dashboard backend (stores alerts, streams them over SSE)
    Dashboard(DashboardArgs),
    /// Run the app relay that forwards mobile alerts to the dashboard
    Relay(RelayArgs),
    /// Replay a JSON-lines position feed through the geofence tracker
    Track(TrackArgs),
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Address to bind
    #[arg(long, default_value_t = DEFAULT_BIND_ADDR)]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_DASHBOARD_PORT)]
    pub port: u16,
}

#[derive(Debug, Args)]
pub struct RelayArgs {
    /// Address to bind
    #[arg(long, default_value_t = DEFAULT_BIND_ADDR)]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_RELAY_PORT)]
    pub port: u16,

    /// Dashboard alert-creation endpoint
    #[arg(long, env = "WAYGUARD_DASHBOARD_URL", default_value = DEFAULT_DASHBOARD_ALERTS_URL)]
    pub dashboard_url: String,

    /// Forwarding timeout in seconds
    #[arg(long, default_value_t = FORWARD_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Retries after a connection failure
    #[arg(long, default_value_t = DEFAULT_FORWARD_RETRIES)]
    pub forward_retries: usize,
}

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// JSON-lines position feed (reads stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Region catalog JSON file (built-in catalog when omitted)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Region to watch; repeat to watch several, in order
    #[arg(long = "region", required = true)]
    pub regions: Vec<String>,
}

impl From<DashboardArgs> for DashboardConfig {
    fn from(args: DashboardArgs) -> Self {
        DashboardConfig {
            bind: args.bind,
            port: args.port,
        }
    }
}

impl From<RelayArgs> for RelayConfig {
    fn from(args: RelayArgs) -> Self {
        RelayConfig {
            bind: args.bind,
            port: args.port,
            dashboard_url: args.dashboard_url,
            timeout_seconds: args.timeout_seconds,
            forward_retries: args.forward_retries,
        }
    }
}

impl From<TrackArgs> for TrackConfig {
    fn from(args: TrackArgs) -> Self {
        TrackConfig {
            input: args.input.filter(|p| p.as_os_str() != "-"),
            catalog: args.catalog,
            regions: args.regions,
        }
    }
}
