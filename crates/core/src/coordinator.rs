//! Polling coordinator - owns the latest status snapshot for one router
//!
//! The coordinator is the only component that talks to a [`StatusSource`].
//! Each successful refresh replaces the snapshot wholesale and then calls
//! every subscribed listener synchronously, in subscription order.

use crate::status_source::{BoxedStatusSource, SourceError};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use router_sens_types::{DeviceInfo, Status};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// Handle returned by [`RouterCoordinator::subscribe`]
pub type ListenerId = u64;

/// Receives a callback whenever the coordinator publishes a new snapshot
pub trait CoordinatorListener: Send + Sync {
    fn handle_coordinator_update(&self);
}

/// Polls one router and shares its latest status with all listeners
pub struct RouterCoordinator {
    unique_id: String,
    device_info: DeviceInfo,
    update_interval: Duration,
    source: Mutex<BoxedStatusSource>,
    status: ArcSwap<Status>,
    /// Listeners are held weakly; dropping an entity is enough to stop updates
    listeners: Mutex<Vec<(ListenerId, Weak<dyn CoordinatorListener>)>>,
    next_listener_id: AtomicU64,
    last_update_success: AtomicBool,
    last_updated: Mutex<Option<DateTime<Utc>>>,
}

impl RouterCoordinator {
    pub fn new(
        source: BoxedStatusSource,
        unique_id: impl Into<String>,
        device_info: DeviceInfo,
        update_interval: Duration,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            device_info,
            update_interval,
            source: Mutex::new(source),
            status: ArcSwap::from_pointee(Status::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            last_update_success: AtomicBool::new(true),
            last_updated: Mutex::new(None),
        }
    }

    /// Stable identifier of the router this coordinator polls
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Latest published snapshot (cheap Arc clone)
    pub fn status(&self) -> Arc<Status> {
        self.status.load_full()
    }

    /// False after a failed refresh, until the next successful one
    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::Acquire)
    }

    /// Time of the last successful refresh
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated.lock().ok().and_then(|guard| *guard)
    }

    /// Register a listener; it is called after every successful refresh
    pub fn subscribe(&self, listener: Weak<dyn CoordinatorListener>) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        match self.listeners.lock() {
            Ok(mut listeners) => listeners.push((id, listener)),
            Err(poisoned) => poisoned.into_inner().push((id, listener)),
        }
        id
    }

    /// Remove a listener; returns false if it was not subscribed
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .map(|listeners| listeners.iter().filter(|(_, l)| l.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Initial refresh done while setting up a config entry
    ///
    /// Unlike the periodic refresh, a failure here aborts setup.
    pub fn first_refresh(&self) -> Result<(), SourceError> {
        self.refresh().map_err(|e| {
            warn!("Initial status fetch for {} failed: {}", self.unique_id, e);
            e
        })
    }

    /// Fetch a new snapshot from the source and publish it
    ///
    /// On failure the previous snapshot stays in place and listeners are
    /// not notified.
    pub fn refresh(&self) -> Result<(), SourceError> {
        let result = {
            let mut source = self.source.lock().map_err(|_| SourceError::LockPoisoned)?;
            source.fetch_status()
        };

        match result {
            Ok(status) => {
                if !self.last_update_success.swap(true, Ordering::AcqRel) {
                    info!("Fetching {} data recovered", self.unique_id);
                }
                self.publish(status);
                Ok(())
            }
            Err(e) => {
                if self.last_update_success.swap(false, Ordering::AcqRel) {
                    warn!("Error fetching {} data: {}", self.unique_id, e);
                } else {
                    debug!("Error fetching {} data: {}", self.unique_id, e);
                }
                Err(e)
            }
        }
    }

    /// Publish a snapshot obtained outside the polling cycle
    pub fn set_updated_data(&self, status: Status) {
        self.last_update_success.store(true, Ordering::Release);
        self.publish(status);
    }

    fn publish(&self, status: Status) {
        self.status.store(Arc::new(status));
        if let Ok(mut last_updated) = self.last_updated.lock() {
            *last_updated = Some(Utc::now());
        }
        debug!("Published new status for {}", self.unique_id);
        self.update_listeners();
    }

    /// Call every live listener, pruning the ones that were dropped
    fn update_listeners(&self) {
        // Collect strong handles first so no lock is held while listeners run
        let live: Vec<Arc<dyn CoordinatorListener>> = {
            let mut listeners = match self.listeners.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            listeners.retain(|(_, l)| l.strong_count() > 0);
            listeners.iter().filter_map(|(_, l)| l.upgrade()).collect()
        };

        for listener in live {
            listener.handle_coordinator_update();
        }
    }
}

impl std::fmt::Debug for RouterCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterCoordinator")
            .field("unique_id", &self.unique_id)
            .field("update_interval", &self.update_interval)
            .field("last_update_success", &self.last_update_success())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::status_source::{SourceMetadata, StatusSource};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    /// Hands out queued results, then fails with `Exhausted`
    pub(crate) struct QueueSource {
        metadata: SourceMetadata,
        queue: VecDeque<Result<Status, SourceError>>,
    }

    impl QueueSource {
        pub(crate) fn new(items: Vec<Result<Status, SourceError>>) -> Self {
            Self {
                metadata: SourceMetadata {
                    id: "queue".to_string(),
                    name: "Queue".to_string(),
                    description: "Queued snapshots for tests".to_string(),
                    default_interval: Duration::from_millis(10),
                },
                queue: items.into(),
            }
        }
    }

    impl StatusSource for QueueSource {
        fn metadata(&self) -> &SourceMetadata {
            &self.metadata
        }

        fn fetch_status(&mut self) -> Result<Status, SourceError> {
            self.queue.pop_front().unwrap_or(Err(SourceError::Exhausted))
        }
    }

    pub(crate) fn coordinator(items: Vec<Result<Status, SourceError>>) -> Arc<RouterCoordinator> {
        Arc::new(RouterCoordinator::new(
            Box::new(QueueSource::new(items)),
            "192.168.1.1",
            DeviceInfo::new("tplink_router", "192.168.1.1", "Router", "TP-Link"),
            Duration::from_millis(10),
        ))
    }

    #[derive(Default)]
    struct CountingListener {
        calls: AtomicUsize,
    }

    impl CoordinatorListener for CountingListener {
        fn handle_coordinator_update(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn subscribe(
        coordinator: &RouterCoordinator,
        listener: &Arc<CountingListener>,
    ) -> ListenerId {
        let as_dyn: Arc<dyn CoordinatorListener> = listener.clone();
        coordinator.subscribe(Arc::downgrade(&as_dyn))
    }

    #[test]
    fn test_initial_status_is_empty() {
        let coordinator = coordinator(vec![]);
        assert!(coordinator.status().is_empty());
        assert!(coordinator.last_updated().is_none());
    }

    #[test]
    fn test_refresh_replaces_snapshot_and_notifies() {
        let status = Status {
            wired_total: Some(3),
            ..Default::default()
        };
        let coordinator = coordinator(vec![Ok(status.clone())]);
        let listener = Arc::new(CountingListener::default());
        subscribe(&coordinator, &listener);

        coordinator.refresh().unwrap();

        assert_eq!(*coordinator.status(), status);
        assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
        assert!(coordinator.last_update_success());
        assert!(coordinator.last_updated().is_some());
    }

    #[test]
    fn test_failed_refresh_keeps_stale_snapshot() {
        let status = Status {
            clients_total: Some(12),
            ..Default::default()
        };
        let coordinator = coordinator(vec![Ok(status.clone())]);
        let listener = Arc::new(CountingListener::default());
        subscribe(&coordinator, &listener);

        coordinator.refresh().unwrap();
        let err = coordinator.refresh().unwrap_err();

        assert!(matches!(err, SourceError::Exhausted));
        assert_eq!(*coordinator.status(), status);
        assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
        assert!(!coordinator.last_update_success());
    }

    #[test]
    fn test_first_refresh_propagates_error() {
        let coordinator = coordinator(vec![Err(SourceError::Config("no host".to_string()))]);
        assert!(matches!(coordinator.first_refresh(), Err(SourceError::Config(_))));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let coordinator = coordinator(vec![Ok(Status::default()), Ok(Status::default())]);
        let listener = Arc::new(CountingListener::default());
        let id = subscribe(&coordinator, &listener);

        coordinator.refresh().unwrap();
        assert!(coordinator.unsubscribe(id));
        assert!(!coordinator.unsubscribe(id));
        coordinator.refresh().unwrap();

        assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let coordinator = coordinator(vec![Ok(Status::default())]);
        let listener = Arc::new(CountingListener::default());
        subscribe(&coordinator, &listener);
        assert_eq!(coordinator.listener_count(), 1);

        drop(listener);
        coordinator.refresh().unwrap();
        assert_eq!(coordinator.listener_count(), 0);
    }

    #[test]
    fn test_set_updated_data_notifies() {
        let coordinator = coordinator(vec![]);
        let listener = Arc::new(CountingListener::default());
        subscribe(&coordinator, &listener);

        coordinator.set_updated_data(Status {
            cpu_usage: Some(0.1),
            ..Default::default()
        });

        assert_eq!(coordinator.status().cpu_usage, Some(0.1));
        assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
    }
}
