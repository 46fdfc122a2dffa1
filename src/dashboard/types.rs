//! Alert dashboard data structures.
//!
//! JSON field names are camelCase to match what the mobile client and the
//! dashboard page exchange.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::{DEFAULT_ALERT_MESSAGE, MAX_ALERT_MESSAGE_CHARS};
use crate::error_handling::{AlertError, FieldError};

/// Kind of emergency reported by the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmergencyType {
    Medical,
    Accident,
    Breakdown,
    Security,
    Other,
}

/// Lifecycle of an alert on the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
    Cancelled,
}

/// Where the user was when the alert was raised. Every field is optional:
/// the client sends nulls when location permission was denied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertLocation {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl AlertLocation {
    pub fn unavailable() -> Self {
        Self {
            address: Some("Location unavailable".to_string()),
            ..Default::default()
        }
    }
}

/// A stored emergency alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: u64,
    pub user_id: String,
    pub emergency_type: EmergencyType,
    pub message: String,
    pub location: AlertLocation,
    /// Free-form profile details forwarded by the client
    pub user_info: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
    pub priority: String,
    pub responded_by: Option<String>,
    /// Time of the first status change
    pub response_time: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Body of `POST /api/alerts`. Unknown fields (device info, app version, ...)
/// are accepted and dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlertRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub emergency_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub location: Option<AlertLocation>,
    #[serde(default)]
    pub user_info: Option<serde_json::Value>,
}

/// A validated alert ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub user_id: String,
    pub emergency_type: EmergencyType,
    pub message: String,
    pub location: AlertLocation,
    pub user_info: serde_json::Value,
}

impl NewAlertRequest {
    /// Checks every field and reports all failures at once.
    pub fn validate(self) -> Result<NewAlert, AlertError> {
        let mut errors = Vec::new();

        let user_id = self.user_id.unwrap_or_default();
        if user_id.is_empty() {
            errors.push(FieldError::new("userId", "User ID is required"));
        }

        let emergency_type = match self.emergency_type.as_deref() {
            None => EmergencyType::Other,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.push(FieldError::new(
                    "emergencyType",
                    "Valid emergency type required",
                ));
                EmergencyType::Other
            }),
        };

        if let Some(location) = &self.location {
            if let Some(lat) = location.latitude {
                if !(-90.0..=90.0).contains(&lat) {
                    errors.push(FieldError::new(
                        "location.latitude",
                        "Valid latitude required",
                    ));
                }
            }
            if let Some(lon) = location.longitude {
                if !(-180.0..=180.0).contains(&lon) {
                    errors.push(FieldError::new(
                        "location.longitude",
                        "Valid longitude required",
                    ));
                }
            }
        }

        let message = match self.message {
            Some(message) if message.chars().count() > MAX_ALERT_MESSAGE_CHARS => {
                errors.push(FieldError::new("message", "Message too long"));
                message
            }
            Some(message) if !message.is_empty() => message,
            _ => DEFAULT_ALERT_MESSAGE.to_string(),
        };

        if !errors.is_empty() {
            return Err(AlertError::Validation(errors));
        }

        Ok(NewAlert {
            user_id,
            emergency_type,
            message,
            location: self.location.unwrap_or_else(AlertLocation::unavailable),
            user_info: self
                .user_info
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
        })
    }
}

/// Body of `PATCH /api/alerts/{id}/status`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub responded_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A validated status change.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: AlertStatus,
    pub responded_by: Option<String>,
    pub notes: Option<String>,
}

impl StatusUpdateRequest {
    pub fn validate(self) -> Result<StatusUpdate, AlertError> {
        let mut errors = Vec::new();

        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<AlertStatus>().ok());
        if status.is_none() {
            errors.push(FieldError::new("status", "Valid status required"));
        }

        if let Some(responder) = &self.responded_by {
            if responder.is_empty() {
                errors.push(FieldError::new("respondedBy", "Responder info required"));
            }
        }

        match status {
            Some(status) if errors.is_empty() => Ok(StatusUpdate {
                status,
                responded_by: self.responded_by,
                notes: self.notes,
            }),
            _ => Err(AlertError::Validation(errors)),
        }
    }
}

/// Query string of `GET /api/alerts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub status: Option<AlertStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number
    pub current: usize,
    /// Number of pages
    pub total: usize,
    /// Alerts on this page
    pub count: usize,
    /// Alerts matching the filter
    pub total_alerts: usize,
}

/// Aggregate counters over the stored alerts.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub total: usize,
    pub active: usize,
    pub acknowledged: usize,
    pub resolved: usize,
    pub cancelled: usize,
    /// active + acknowledged, the "needs attention" figure of the dashboard
    pub open: usize,
    pub last24_hours: usize,
    pub by_type: BTreeMap<String, usize>,
}

/// One page of `GET /api/alerts`.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPage {
    pub alerts: Vec<Alert>,
    pub pagination: Pagination,
    pub stats: AlertStats,
}

/// Message pushed to dashboard listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DashboardEvent {
    /// First message of every stream
    Connected { alerts_count: usize },
    NewAlert { alert: Alert, total_alerts: usize },
    StatusUpdate {
        alert_id: u64,
        previous_status: AlertStatus,
        new_status: AlertStatus,
        alert: Alert,
    },
}
