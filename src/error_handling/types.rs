//! Error type definitions.
//!
//! This module defines the error types and outcome kinds used throughout the
//! application.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Validation failures of tracker operations.
///
/// Both are local: the active region set is unchanged when either is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeofenceError {
    /// The name is not in the region catalog.
    #[error("Unknown region '{name}'")]
    InvalidRegion { name: String },

    /// The removal index is past the end of the active set.
    #[error("Region index {index} out of range (active regions: {len})")]
    Index { index: usize, len: usize },
}

/// Errors loading a region catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read region catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid region catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Region '{name}' has invalid radius {radius}")]
    InvalidRadius { name: String, radius: f64 },
}

/// Errors of a task-backed tracking session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Geofence(#[from] GeofenceError),

    /// The session has been stopped.
    #[error("Tracking session is closed")]
    Closed,
}

/// One rejected field of an incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors answered by the alert dashboard.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Alert not found")]
    NotFound(u64),

    #[error("Malformed request body: {0}")]
    BadRequest(String),
}

/// Failures forwarding an alert from the relay to the dashboard.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The dashboard could not be reached at all.
    #[error("Failed to connect to dashboard: {0}")]
    Connect(#[source] ReqwestError),

    #[error("Dashboard did not answer within the timeout")]
    Timeout(#[source] ReqwestError),

    /// Any other transport-level failure after the request may have been sent.
    #[error("Request to dashboard failed: {0}")]
    Transport(#[source] ReqwestError),

    /// The dashboard answered with a non-success status.
    #[error("Dashboard rejected alert ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Dashboard response was not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl RelayError {
    /// Classifies a transport error from `reqwest`.
    pub fn from_transport(error: ReqwestError) -> Self {
        // A connect-phase timeout is a connect error: nothing was sent yet
        if error.is_connect() {
            RelayError::Connect(error)
        } else if error.is_timeout() {
            RelayError::Timeout(error)
        } else {
            RelayError::Transport(error)
        }
    }

    /// Only connection failures are retried: the alert never reached the
    /// dashboard, so resending cannot duplicate it.
    pub fn is_retriable(&self) -> bool {
        matches!(self, RelayError::Connect(_))
    }
}

/// Outcome of one forwarding request handled by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ForwardOutcome {
    Forwarded,
    UpstreamRejected,
    Timeout,
    ConnectFailed,
    TransportFailed,
    DecodeFailed,
    /// Set per retry attempt, in addition to the final outcome
    Retried,
}

impl ForwardOutcome {
    /// Returns a human-readable string representation of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardOutcome::Forwarded => "Forwarded",
            ForwardOutcome::UpstreamRejected => "Rejected by dashboard",
            ForwardOutcome::Timeout => "Dashboard timeout",
            ForwardOutcome::ConnectFailed => "Dashboard unreachable",
            ForwardOutcome::TransportFailed => "Transport error",
            ForwardOutcome::DecodeFailed => "Undecodable dashboard response",
            ForwardOutcome::Retried => "Retried after connection failure",
        }
    }

    /// Prometheus label value.
    pub fn label(&self) -> &'static str {
        match self {
            ForwardOutcome::Forwarded => "forwarded",
            ForwardOutcome::UpstreamRejected => "upstream_rejected",
            ForwardOutcome::Timeout => "timeout",
            ForwardOutcome::ConnectFailed => "connect_failed",
            ForwardOutcome::TransportFailed => "transport_failed",
            ForwardOutcome::DecodeFailed => "decode_failed",
            ForwardOutcome::Retried => "retried",
        }
    }
}

impl From<&RelayError> for ForwardOutcome {
    fn from(error: &RelayError) -> Self {
        match error {
            RelayError::Connect(_) => ForwardOutcome::ConnectFailed,
            RelayError::Timeout(_) => ForwardOutcome::Timeout,
            RelayError::Transport(_) => ForwardOutcome::TransportFailed,
            RelayError::Upstream { .. } => ForwardOutcome::UpstreamRejected,
            RelayError::Decode(_) => ForwardOutcome::DecodeFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_geofence_error_messages() {
        let err = GeofenceError::InvalidRegion {
            name: "Atlantis".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown region 'Atlantis'");

        let err = GeofenceError::Index { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "Region index 4 out of range (active regions: 2)"
        );
    }

    #[test]
    fn test_session_error_is_transparent() {
        let err = SessionError::from(GeofenceError::Index { index: 0, len: 0 });
        assert_eq!(err.to_string(), "Region index 0 out of range (active regions: 0)");
    }

    #[test]
    fn test_upstream_is_not_retriable() {
        let err = RelayError::Upstream {
            status: 400,
            message: "Missing required alert data".to_string(),
        };
        assert!(!err.is_retriable());
        assert_eq!(ForwardOutcome::from(&err), ForwardOutcome::UpstreamRejected);
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_forward_outcome_labels_unique() {
        let labels: std::collections::HashSet<_> =
            ForwardOutcome::iter().map(|o| o.label()).collect();
        assert_eq!(labels.len(), ForwardOutcome::iter().count());
        for outcome in ForwardOutcome::iter() {
            assert!(!outcome.as_str().is_empty());
        }
    }
}
