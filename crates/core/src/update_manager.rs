//! Update manager for scheduling coordinator refreshes

use crate::coordinator::RouterCoordinator;
use log::{error, trace, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Tracks refresh timing for a coordinator
struct CoordinatorUpdateState {
    coordinator: Arc<RouterCoordinator>,
    last_update: Option<Instant>,
}

impl CoordinatorUpdateState {
    fn is_due(&self, now: Instant) -> bool {
        match self.last_update {
            Some(last) => now.duration_since(last) >= self.coordinator.update_interval(),
            None => true,
        }
    }
}

/// Periodically refreshes every registered coordinator at its own interval
pub struct UpdateManager {
    coordinators: Arc<RwLock<HashMap<String, CoordinatorUpdateState>>>,
}

impl UpdateManager {
    /// Create a new update manager
    pub fn new() -> Self {
        Self {
            coordinators: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a coordinator to be refreshed
    ///
    /// Coordinators that were just refreshed during setup can pass
    /// `refreshed = true` so the first poll waits a full interval.
    pub async fn add_coordinator(
        &self,
        key: impl Into<String>,
        coordinator: Arc<RouterCoordinator>,
        refreshed: bool,
    ) {
        let mut coordinators = self.coordinators.write().await;
        coordinators.insert(
            key.into(),
            CoordinatorUpdateState {
                coordinator,
                last_update: refreshed.then(Instant::now),
            },
        );
    }

    /// Stop refreshing a coordinator
    pub async fn remove_coordinator(&self, key: &str) -> bool {
        self.coordinators.write().await.remove(key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.coordinators.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Start the update loop
    ///
    /// This runs indefinitely, refreshing each coordinator at its configured interval.
    pub async fn run(&self, base_interval: Duration) {
        let mut interval = tokio::time::interval(base_interval);

        loop {
            interval.tick().await;

            let start = Instant::now();
            let refreshed = self.update_all().await;

            if refreshed > 0 {
                trace!("Refreshed {} coordinators in {:?}", refreshed, start.elapsed());
            }
        }
    }

    /// Refresh all coordinators that are due; returns how many were refreshed
    pub async fn update_all(&self) -> usize {
        let now = Instant::now();

        let mut tasks = Vec::new();
        {
            let mut coordinators = self.coordinators.write().await;
            for (key, state) in coordinators.iter_mut() {
                if !state.is_due(now) {
                    continue;
                }
                state.last_update = Some(now);

                // Sources do blocking I/O
                let coordinator = Arc::clone(&state.coordinator);
                let task = tokio::task::spawn_blocking(move || coordinator.refresh());
                tasks.push((key.clone(), task));
            }
        } // Release write lock before awaiting tasks

        let count = tasks.len();
        for (key, task) in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Refresh of {} failed: {}", key, e),
                Err(e) => error!("Refresh task failed for {}: {}", key, e),
            }
        }

        count
    }
}

impl Default for UpdateManager {
    fn default() -> Self {
        Self::new()
    }
}
