//! Forwarding of alert payloads to the dashboard.

use std::sync::atomic::{AtomicU32, Ordering};

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error_handling::{get_retry_strategy, ForwardOutcome, ForwardStats, RelayError};

/// Result of a successful forward.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardReceipt {
    /// Id assigned by the dashboard, when its response carries one
    pub alert_id: Option<Value>,
    /// Attempts made, including the first
    pub attempts: u32,
}

/// Posts `payload` to the dashboard, retrying connection failures up to
/// `retries` times.
///
/// Timeouts, transport errors after connecting, and non-2xx answers are
/// returned at once. Each retry is counted as [`ForwardOutcome::Retried`];
/// the final outcome is left to the caller.
pub async fn forward_alert(
    client: &Client,
    url: &Url,
    payload: &Value,
    retries: usize,
    stats: &ForwardStats,
) -> Result<ForwardReceipt, RelayError> {
    let attempts = AtomicU32::new(0);

    let alert_id = tokio_retry::RetryIf::spawn(
        get_retry_strategy(retries),
        || {
            if attempts.fetch_add(1, Ordering::SeqCst) > 0 {
                stats.increment(ForwardOutcome::Retried);
                log::warn!("Retrying alert forward to {}", url);
            }
            send_once(client, url, payload)
        },
        RelayError::is_retriable,
    )
    .await?;

    Ok(ForwardReceipt {
        alert_id,
        attempts: attempts.load(Ordering::SeqCst),
    })
}

async fn send_once(client: &Client, url: &Url, payload: &Value) -> Result<Option<Value>, RelayError> {
    let response = client
        .post(url.clone())
        .json(payload)
        .send()
        .await
        .map_err(RelayError::from_transport)?;

    let status = response.status();
    let body = response.text().await.map_err(RelayError::from_transport)?;

    if !status.is_success() {
        return Err(RelayError::Upstream {
            status: status.as_u16(),
            message: upstream_message(&body),
        });
    }

    let body: Value = serde_json::from_str(&body).map_err(RelayError::Decode)?;
    log::debug!("Dashboard accepted alert: {}", body);
    Ok(extract_alert_id(&body))
}

/// `alertId`, or `alert.id` for dashboards that only echo the alert.
fn extract_alert_id(body: &Value) -> Option<Value> {
    body.get("alertId")
        .or_else(|| body.get("alert").and_then(|alert| alert.get("id")))
        .filter(|id| !id.is_null())
        .cloned()
}

/// The `error` field of a JSON error body, else the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
