//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including geodesy parameters, server defaults, and alert limits.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

// Geodesy
/// Mean Earth radius in meters used by the haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// Network defaults
/// Default listen port of the alert dashboard backend
pub const DEFAULT_DASHBOARD_PORT: u16 = 3001;
/// Default listen port of the app relay
pub const DEFAULT_RELAY_PORT: u16 = 4000;
/// Default bind address for both servers
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
/// Where the relay forwards alerts unless told otherwise
pub const DEFAULT_DASHBOARD_ALERTS_URL: &str = "http://localhost:3001/api/alerts";
/// Forwarding timeout in seconds
/// Matches the 10s abort the mobile client applies to its own request
pub const FORWARD_TIMEOUT_SECS: u64 = 10;
/// User-Agent sent by the relay when forwarding
pub const RELAY_USER_AGENT: &str = concat!("wayguard-relay/", env!("CARGO_PKG_VERSION"));

// Retry strategy
/// Initial delay in milliseconds before the first forwarding retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 250;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 2;
/// Default number of retries after a connection failure (initial attempt not counted)
pub const DEFAULT_FORWARD_RETRIES: usize = 2;

// Alert store limits
/// Maximum number of alerts kept in memory; the oldest are evicted first
pub const MAX_STORED_ALERTS: usize = 100;
/// Maximum alert message length in characters
pub const MAX_ALERT_MESSAGE_CHARS: usize = 500;
/// Message stored when the client sends none
pub const DEFAULT_ALERT_MESSAGE: &str = "Emergency assistance needed";
/// Default page size of `GET /api/alerts`
pub const DEFAULT_PAGE_LIMIT: usize = 20;
/// Upper bound on the page size of `GET /api/alerts`
pub const MAX_PAGE_LIMIT: usize = 100;
/// Window used by the `last24Hours` statistic
pub const RECENT_ALERT_WINDOW: chrono::TimeDelta = chrono::TimeDelta::hours(24);

// SSE
/// Capacity of the dashboard broadcast channel.
/// A listener that falls further behind than this skips the missed events.
pub const BROADCAST_CAPACITY: usize = 256;
/// Keep-alive interval for SSE connections
pub const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

// Tracking session
/// Command queue depth of a tracking session
pub const SESSION_QUEUE_DEPTH: usize = 64;
/// Capacity of the region-reached broadcast channel of a tracking session
pub const SESSION_EVENT_CAPACITY: usize = 64;

/// Service name reported by the dashboard health endpoint
pub const SERVICE_NAME: &str = "Emergency Alert System";
