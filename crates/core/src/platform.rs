//! Sensor platform - sets up and tears down entities per config entry
//!
//! This is the host side of the integration: it owns the state store,
//! registers the entities produced by [`sensor::setup_entry`] and keeps
//! their coordinator subscriptions alive until the entry is unloaded.

use crate::coordinator::{CoordinatorListener, ListenerId, RouterCoordinator};
use crate::sensor::{self, RouterSensor};
use crate::state_store::{StateStore, StateWriter};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// A configured router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub title: String,
}

impl ConfigEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            entry_id: Uuid::new_v4().simple().to_string(),
            title: title.into(),
        }
    }
}

struct LoadedEntry {
    coordinator: Arc<RouterCoordinator>,
    sensors: Vec<(Arc<RouterSensor>, ListenerId)>,
}

/// Registers router sensors and holds them while their entry is loaded
pub struct SensorPlatform {
    store: Arc<StateStore>,
    entries: Mutex<HashMap<String, LoadedEntry>>,
}

impl SensorPlatform {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self {
            store,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Set up all sensors for one config entry
    ///
    /// Runs the coordinator's first refresh; if that fails the entry is not
    /// loaded. Returns the number of entities added.
    pub fn setup_entry(
        &self,
        entry: &ConfigEntry,
        coordinator: Arc<RouterCoordinator>,
    ) -> Result<usize> {
        if self.is_loaded(&entry.entry_id)? {
            return Err(anyhow!("Config entry {} is already loaded", entry.entry_id));
        }

        // Blocking I/O; the entry lock is not held so listeners may call back in
        coordinator
            .first_refresh()
            .with_context(|| format!("Router {} is not ready", entry.title))?;

        let mut entries = self.entries.lock().map_err(|_| anyhow!("Entry lock poisoned"))?;
        if entries.contains_key(&entry.entry_id) {
            return Err(anyhow!("Config entry {} is already loaded", entry.entry_id));
        }

        // Unique ids already claimed by any loaded entry
        let mut known: HashSet<String> = entries
            .values()
            .flat_map(|e| e.sensors.iter().map(|(s, _)| s.unique_id().to_string()))
            .collect();

        let mut added = Vec::new();
        sensor::setup_entry(&coordinator, &mut |entities: Vec<Arc<RouterSensor>>, _update: bool| {
            added.extend(entities)
        });

        let mut sensors = Vec::with_capacity(added.len());
        for sensor in added {
            if !known.insert(sensor.unique_id().to_string()) {
                warn!(
                    "Sensor with unique id {} already exists - ignoring",
                    sensor.unique_id()
                );
                continue;
            }
            let writer: Arc<dyn StateWriter> = self.store.clone();
            sensor.attach(writer);
            let listener: Arc<dyn CoordinatorListener> = sensor.clone();
            let id = coordinator.subscribe(Arc::downgrade(&listener));
            // Record the state of the snapshot fetched by the first refresh
            sensor.handle_coordinator_update();
            debug!("Added {} ({})", sensor.entity_id(), sensor.unique_id());
            sensors.push((sensor, id));
        }

        let count = sensors.len();
        info!(
            "Set up {} sensors for {} (entry {})",
            count, entry.title, entry.entry_id
        );
        entries.insert(
            entry.entry_id.clone(),
            LoadedEntry {
                coordinator,
                sensors,
            },
        );
        Ok(count)
    }

    fn is_loaded(&self, entry_id: &str) -> Result<bool> {
        let entries = self.entries.lock().map_err(|_| anyhow!("Entry lock poisoned"))?;
        Ok(entries.contains_key(entry_id))
    }

    /// Unload an entry, dropping its sensors and their states
    pub fn unload_entry(&self, entry_id: &str) -> bool {
        let removed = match self.entries.lock() {
            Ok(mut entries) => entries.remove(entry_id),
            Err(_) => None,
        };

        match removed {
            Some(loaded) => {
                // A notification already in flight may still reach these sensors
                for (sensor, _) in &loaded.sensors {
                    sensor.detach();
                }
                for (sensor, id) in &loaded.sensors {
                    loaded.coordinator.unsubscribe(*id);
                    self.store.remove_state(sensor.unique_id());
                }
                info!("Unloaded entry {} ({} sensors)", entry_id, loaded.sensors.len());
                true
            }
            None => {
                debug!("Entry {} was not loaded", entry_id);
                false
            }
        }
    }

    /// Coordinators of all loaded entries, keyed by entry id
    pub fn coordinators(&self) -> Vec<(String, Arc<RouterCoordinator>)> {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, e)| (id.clone(), Arc::clone(&e.coordinator)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sensors of a loaded entry, in table order
    pub fn sensors(&self, entry_id: &str) -> Vec<Arc<RouterSensor>> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| {
                entries
                    .get(entry_id)
                    .map(|e| e.sensors.iter().map(|(s, _)| Arc::clone(s)).collect())
            })
            .unwrap_or_default()
    }
}
