//! Relay forwarding tests against a mocked dashboard.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wayguard::dashboard::AlertStore;
use wayguard::error_handling::ForwardOutcome;

mod helpers;

fn mobile_alert() -> Value {
    json!({
        "userId": "user_1",
        "alertType": "emergency",
        "emergencyType": "security",
        "message": "Being followed",
        "location": {"latitude": 28.61, "longitude": 77.21, "address": "Janpath", "accuracy": 12.0},
        "source": "mobile_app"
    })
}

#[tokio::test]
async fn test_alert_is_forwarded_unchanged() {
    let dashboard = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/alerts"))
        .and(header("content-type", "application/json"))
        .and(body_json(mobile_alert()))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"success": true, "alertId": 42})),
        )
        .expect(1)
        .mount(&dashboard)
        .await;

    let (relay, state) =
        helpers::spawn_relay(&format!("{}/api/alerts", dashboard.uri()), 2).await;

    let response = reqwest::Client::new()
        .post(relay.url("/trigger-alert"))
        .json(&mobile_alert())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Alert successfully sent to dashboard system.",
            "alertId": 42
        })
    );
    assert_eq!(state.stats.get(ForwardOutcome::Forwarded), 1);
}

#[tokio::test]
async fn test_upstream_error_is_not_retried() {
    let dashboard = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/alerts"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"success": false, "error": "Validation failed"})),
        )
        .expect(1)
        .mount(&dashboard)
        .await;

    let (relay, state) =
        helpers::spawn_relay(&format!("{}/api/alerts", dashboard.uri()), 3).await;

    let response = reqwest::Client::new()
        .post(relay.url("/api/emergency/alert"))
        .json(&json!({"message": "no user"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": false, "error": "Could not process the alert."})
    );
    assert_eq!(state.stats.get(ForwardOutcome::UpstreamRejected), 1);
    assert_eq!(state.stats.get(ForwardOutcome::Retried), 0);
}

#[tokio::test]
async fn test_undecodable_success_body_fails() {
    let dashboard = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&dashboard)
        .await;

    let (relay, state) =
        helpers::spawn_relay(&format!("{}/api/alerts", dashboard.uri()), 0).await;

    let response = reqwest::Client::new()
        .post(relay.url("/trigger-alert"))
        .json(&mobile_alert())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(state.stats.get(ForwardOutcome::DecodeFailed), 1);
}

#[tokio::test]
async fn test_unreachable_dashboard() {
    let url = format!("http://127.0.0.1:{}/api/alerts", helpers::unused_port());
    let (relay, state) = helpers::spawn_relay(&url, 1).await;

    let response = reqwest::Client::new()
        .post(relay.url("/trigger-alert"))
        .json(&mobile_alert())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    assert_eq!(state.stats.get(ForwardOutcome::ConnectFailed), 1);
    assert_eq!(state.stats.get(ForwardOutcome::Retried), 1);
}

#[tokio::test]
async fn test_slow_dashboard_is_not_retried() {
    let dashboard = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/alerts"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"success": true, "alertId": 7}))
                .set_delay(Duration::from_secs(4)),
        )
        .expect(1)
        .mount(&dashboard)
        .await;

    // Relay timeout is 2 s
    let (relay, state) =
        helpers::spawn_relay(&format!("{}/api/alerts", dashboard.uri()), 3).await;

    let response = reqwest::Client::new()
        .post(relay.url("/trigger-alert"))
        .json(&mobile_alert())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let received = dashboard.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(state.stats.get(ForwardOutcome::Timeout), 1);
    assert_eq!(state.stats.get(ForwardOutcome::Retried), 0);
}

#[tokio::test]
async fn test_non_object_payload_is_rejected() {
    let dashboard = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&dashboard)
        .await;
    let (relay, _state) =
        helpers::spawn_relay(&format!("{}/api/alerts", dashboard.uri()), 0).await;

    let response = reqwest::Client::new()
        .post(relay.url("/trigger-alert"))
        .json(&json!(["not", "an", "object"]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_health_names_dashboard() {
    let (relay, _state) = helpers::spawn_relay("http://localhost:3001/api/alerts", 0).await;
    let body: Value = reqwest::Client::new()
        .get(relay.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({"status": "OK", "dashboard": "http://localhost:3001/api/alerts"})
    );
}

#[tokio::test]
async fn test_relay_into_real_dashboard() {
    let store = Arc::new(AlertStore::new());
    let dashboard = helpers::spawn_dashboard(Arc::clone(&store)).await;
    let (relay, _state) = helpers::spawn_relay(&dashboard.url("/api/alerts"), 0).await;

    let body: Value = reqwest::Client::new()
        .post(relay.url("/trigger-alert"))
        .json(&mobile_alert())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["alertId"], 1);
    let stored = store.get(1).unwrap();
    assert_eq!(stored.user_id, "user_1");
    assert_eq!(stored.message, "Being followed");
}
