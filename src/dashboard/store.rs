//! In-memory alert store with broadcast fan-out.
//!
//! Alerts live in a bounded, newest-first deque behind a mutex that is never
//! held across an await. Every change is published on a broadcast channel
//! that backs the SSE stream.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use log::info;
use tokio::sync::broadcast;

use super::types::{
    Alert, AlertPage, AlertStats, AlertStatus, DashboardEvent, ListQuery, NewAlert, Pagination,
    StatusUpdate,
};
use crate::config::{
    BROADCAST_CAPACITY, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MAX_STORED_ALERTS, RECENT_ALERT_WINDOW,
};
use crate::error_handling::AlertError;

struct StoreInner {
    /// Newest first
    alerts: VecDeque<Alert>,
    next_id: u64,
}

pub struct AlertStore {
    inner: Mutex<StoreInner>,
    events: broadcast::Sender<DashboardEvent>,
    capacity: usize,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_STORED_ALERTS)
    }

    /// A store keeping at most `capacity` alerts (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Mutex::new(StoreInner {
                alerts: VecDeque::new(),
                next_id: 1,
            }),
            events,
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Every critical section leaves the data consistent, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a new alert, evicting the oldest beyond capacity, and broadcasts it.
    pub fn create(&self, new: NewAlert) -> Alert {
        let alert = {
            let mut inner = self.lock();
            let alert = Alert {
                id: inner.next_id,
                user_id: new.user_id,
                emergency_type: new.emergency_type,
                message: new.message,
                location: new.location,
                user_info: new.user_info,
                timestamp: Utc::now(),
                status: AlertStatus::Active,
                priority: "high".to_string(),
                responded_by: None,
                response_time: None,
                updated_at: None,
                notes: None,
            };
            inner.next_id += 1;
            inner.alerts.push_front(alert.clone());
            inner.alerts.truncate(self.capacity);
            let total_alerts = inner.alerts.len();
            // Published under the lock so listeners see changes in store order
            self.publish(DashboardEvent::NewAlert {
                alert: alert.clone(),
                total_alerts,
            });
            alert
        };

        info!(
            "🚨 New emergency alert #{} from {}: {} - {}",
            alert.id,
            alert.user_id,
            alert.emergency_type.to_string().to_uppercase(),
            alert.message
        );
        match (alert.location.latitude, alert.location.longitude) {
            (Some(lat), Some(lon)) => info!("   Location: {}, {}", lat, lon),
            _ => info!("   Location: not provided"),
        }

        alert
    }

    pub fn get(&self, id: u64) -> Option<Alert> {
        self.lock().alerts.iter().find(|a| a.id == id).cloned()
    }

    /// Applies a status change and broadcasts it.
    ///
    /// `respondedBy` and `notes` keep their previous value when omitted;
    /// `responseTime` is set on the first change only.
    pub fn update_status(&self, id: u64, update: StatusUpdate) -> Result<Alert, AlertError> {
        let (previous_status, alert) = {
            let mut inner = self.lock();
            let alert = inner
                .alerts
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or(AlertError::NotFound(id))?;

            let now = Utc::now();
            let previous_status = alert.status;
            alert.status = update.status;
            if update.responded_by.is_some() {
                alert.responded_by = update.responded_by;
            }
            if update.notes.is_some() {
                alert.notes = update.notes;
            }
            alert.response_time.get_or_insert(now);
            alert.updated_at = Some(now);
            let alert = alert.clone();
            self.publish(DashboardEvent::StatusUpdate {
                alert_id: id,
                previous_status,
                new_status: alert.status,
                alert: alert.clone(),
            });
            (previous_status, alert)
        };

        info!(
            "🔄 Alert {} status updated: {} → {}",
            id,
            previous_status,
            alert.status.to_string().to_uppercase()
        );

        Ok(alert)
    }

    /// One page of alerts, newest first, optionally filtered by status.
    ///
    /// `page` and `limit` of 0 fall back to their defaults; `limit` is capped.
    pub fn list(&self, query: &ListQuery) -> AlertPage {
        let page = query.page.filter(|&p| p > 0).unwrap_or(1);
        let limit = query
            .limit
            .filter(|&l| l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);

        let inner = self.lock();
        let matching: Vec<&Alert> = inner
            .alerts
            .iter()
            .filter(|a| query.status.is_none_or(|status| a.status == status))
            .collect();

        let alerts: Vec<Alert> = matching
            .iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .map(|a| (*a).clone())
            .collect();

        let pagination = Pagination {
            current: page,
            total: matching.len().div_ceil(limit),
            count: alerts.len(),
            total_alerts: matching.len(),
        };
        let stats = compute_stats(inner.alerts.iter(), Utc::now());

        AlertPage {
            alerts,
            pagination,
            stats,
        }
    }

    pub fn stats(&self) -> AlertStats {
        self.stats_at(Utc::now())
    }

    /// Statistics as seen at `now` (drives the 24-hour window).
    pub fn stats_at(&self, now: DateTime<Utc>) -> AlertStats {
        compute_stats(self.lock().alerts.iter(), now)
    }

    pub fn len(&self) -> usize {
        self.lock().alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alerts created since start, including evicted ones.
    pub fn created_total(&self) -> u64 {
        self.lock().next_id - 1
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Never blocks, so it may be called with the store locked.
    fn publish(&self, event: DashboardEvent) {
        // An error only means nobody is listening
        let _ = self.events.send(event);
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_stats<'a>(alerts: impl Iterator<Item = &'a Alert>, now: DateTime<Utc>) -> AlertStats {
    let since = now - RECENT_ALERT_WINDOW;
    let mut stats = AlertStats::default();

    for alert in alerts {
        stats.total += 1;
        match alert.status {
            AlertStatus::Active => stats.active += 1,
            AlertStatus::Acknowledged => stats.acknowledged += 1,
            AlertStatus::Resolved => stats.resolved += 1,
            AlertStatus::Cancelled => stats.cancelled += 1,
        }
        if alert.timestamp > since {
            stats.last24_hours += 1;
        }
        *stats
            .by_type
            .entry(alert.emergency_type.to_string())
            .or_default() += 1;
    }
    stats.open = stats.active + stats.acknowledged;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::types::{AlertLocation, EmergencyType};

    fn new_alert(user: &str, kind: EmergencyType) -> NewAlert {
        NewAlert {
            user_id: user.to_string(),
            emergency_type: kind,
            message: "help".to_string(),
            location: AlertLocation::unavailable(),
            user_info: serde_json::json!({}),
        }
    }

    fn resolve() -> StatusUpdate {
        StatusUpdate {
            status: AlertStatus::Resolved,
            responded_by: Some("Unit 7".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_ids_increase_and_list_is_newest_first() {
        let store = AlertStore::new();
        for i in 0..3 {
            store.create(new_alert(&format!("u{i}"), EmergencyType::Other));
        }
        let page = store.list(&ListQuery::default());
        let ids: Vec<u64> = page.alerts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(page.alerts[0].status, AlertStatus::Active);
        assert_eq!(page.alerts[0].priority, "high");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = AlertStore::with_capacity(2);
        for _ in 0..3 {
            store.create(new_alert("u", EmergencyType::Other));
        }
        assert_eq!(store.len(), 2);
        assert!(store.get(1).is_none());
        assert!(store.get(3).is_some());
        assert_eq!(store.created_total(), 3);
    }

    #[test]
    fn test_pagination_and_filter() {
        let store = AlertStore::new();
        for _ in 0..5 {
            store.create(new_alert("u", EmergencyType::Medical));
        }
        store.update_status(2, resolve()).unwrap();

        let page = store.list(&ListQuery {
            page: Some(2),
            limit: Some(2),
            status: None,
        });
        assert_eq!(
            page.alerts.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![3, 2]
        );
        assert_eq!(
            page.pagination,
            Pagination {
                current: 2,
                total: 3,
                count: 2,
                total_alerts: 5
            }
        );

        let resolved = store.list(&ListQuery {
            status: Some(AlertStatus::Resolved),
            ..Default::default()
        });
        assert_eq!(resolved.alerts.len(), 1);
        assert_eq!(resolved.pagination.total_alerts, 1);
        assert_eq!(resolved.stats.total, 5);
    }

    #[test]
    fn test_zero_page_and_limit_fall_back() {
        let store = AlertStore::new();
        store.create(new_alert("u", EmergencyType::Other));
        let page = store.list(&ListQuery {
            page: Some(0),
            limit: Some(0),
            status: None,
        });
        assert_eq!(page.pagination.current, 1);
        assert_eq!(page.alerts.len(), 1);
    }

    #[test]
    fn test_empty_store_has_zero_pages() {
        let page = AlertStore::new().list(&ListQuery::default());
        assert_eq!(page.pagination.total, 0);
        assert!(page.alerts.is_empty());
    }

    #[test]
    fn test_update_status_keeps_first_response_time() {
        let store = AlertStore::new();
        store.create(new_alert("u", EmergencyType::Accident));

        let first = store
            .update_status(
                1,
                StatusUpdate {
                    status: AlertStatus::Acknowledged,
                    responded_by: Some("Desk".to_string()),
                    notes: Some("on it".to_string()),
                },
            )
            .unwrap();
        let second = store
            .update_status(
                1,
                StatusUpdate {
                    status: AlertStatus::Resolved,
                    responded_by: None,
                    notes: None,
                },
            )
            .unwrap();

        assert_eq!(second.status, AlertStatus::Resolved);
        assert_eq!(second.responded_by.as_deref(), Some("Desk"));
        assert_eq!(second.notes.as_deref(), Some("on it"));
        assert_eq!(second.response_time, first.response_time);
        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn test_update_unknown_alert() {
        let store = AlertStore::new();
        assert_eq!(
            store.update_status(42, resolve()).unwrap_err(),
            AlertError::NotFound(42)
        );
    }

    #[test]
    fn test_stats_counts() {
        let store = AlertStore::new();
        store.create(new_alert("a", EmergencyType::Medical));
        store.create(new_alert("b", EmergencyType::Medical));
        store.create(new_alert("c", EmergencyType::Security));
        store
            .update_status(
                1,
                StatusUpdate {
                    status: AlertStatus::Acknowledged,
                    responded_by: None,
                    notes: None,
                },
            )
            .unwrap();
        store.update_status(2, resolve()).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.acknowledged, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.open, 2);
        assert_eq!(stats.last24_hours, 3);
        assert_eq!(stats.by_type.get("medical"), Some(&2));
        assert_eq!(stats.by_type.get("security"), Some(&1));

        let tomorrow = Utc::now() + chrono::TimeDelta::hours(25);
        assert_eq!(store.stats_at(tomorrow).last24_hours, 0);
    }

    #[tokio::test]
    async fn test_changes_are_broadcast() {
        let store = AlertStore::new();
        let mut rx = store.subscribe();

        store.create(new_alert("u", EmergencyType::Breakdown));
        store.update_status(1, resolve()).unwrap();

        match rx.recv().await.unwrap() {
            DashboardEvent::NewAlert {
                alert,
                total_alerts,
            } => {
                assert_eq!(alert.id, 1);
                assert_eq!(total_alerts, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
        match rx.recv().await.unwrap() {
            DashboardEvent::StatusUpdate {
                alert_id,
                previous_status,
                new_status,
                ..
            } => {
                assert_eq!(alert_id, 1);
                assert_eq!(previous_status, AlertStatus::Active);
                assert_eq!(new_status, AlertStatus::Resolved);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_concurrent_changes_broadcast_in_store_order() {
        let store = AlertStore::new();
        let mut rx = store.subscribe();

        std::thread::scope(|scope| {
            for t in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..15 {
                        let alert = store.create(new_alert(&format!("u{t}"), EmergencyType::Other));
                        store.update_status(alert.id, resolve()).unwrap();
                    }
                });
            }
        });

        let mut last_new = 0;
        let mut last_total = 0;
        let mut announced = std::collections::HashSet::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                DashboardEvent::NewAlert {
                    alert,
                    total_alerts,
                } => {
                    assert!(alert.id > last_new, "alert {} after {}", alert.id, last_new);
                    assert!(total_alerts >= last_total);
                    last_new = alert.id;
                    last_total = total_alerts;
                    announced.insert(alert.id);
                }
                DashboardEvent::StatusUpdate { alert_id, .. } => {
                    assert!(announced.contains(&alert_id), "update before create for {alert_id}");
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(last_new, 120);
        assert_eq!(last_total, MAX_STORED_ALERTS);
    }
}
