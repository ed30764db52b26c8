//! Host-side entity state storage

use log::trace;
use router_sens_types::EntityState;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Sink that entities write their state to
pub trait StateWriter: Send + Sync {
    fn write_state(&self, state: EntityState);

    /// Forget an entity's state (e.g., when its config entry is unloaded)
    fn remove_state(&self, unique_id: &str);
}

/// In-memory state machine keyed by entity unique id
#[derive(Debug, Default)]
pub struct StateStore {
    states: RwLock<BTreeMap<String, EntityState>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last written state of an entity
    pub fn get(&self, unique_id: &str) -> Option<EntityState> {
        self.states.read().ok()?.get(unique_id).cloned()
    }

    /// Look up a state by its entity id (`sensor.<device>_<key>`)
    pub fn get_by_entity_id(&self, entity_id: &str) -> Option<EntityState> {
        self.states
            .read()
            .ok()?
            .values()
            .find(|s| s.entity_id == entity_id)
            .cloned()
    }

    /// All states, ordered by entity id
    pub fn all(&self) -> Vec<EntityState> {
        let mut states: Vec<_> = self
            .states
            .read()
            .map(|states| states.values().cloned().collect())
            .unwrap_or_default();
        states.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        states
    }

    pub fn len(&self) -> usize {
        self.states.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateWriter for StateStore {
    fn write_state(&self, state: EntityState) {
        trace!("{} -> {}", state.entity_id, state.state());
        if let Ok(mut states) = self.states.write() {
            states.insert(state.unique_id.clone(), state);
        }
    }

    fn remove_state(&self, unique_id: &str) {
        if let Ok(mut states) = self.states.write() {
            states.remove(unique_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use router_sens_types::{EntityAttributes, SensorValue};

    fn state(unique_id: &str, entity_id: &str, value: i64) -> EntityState {
        EntityState {
            unique_id: unique_id.to_string(),
            entity_id: entity_id.to_string(),
            value: Some(SensorValue::Integer(value)),
            available: true,
            attributes: EntityAttributes::default(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_write_overwrites_by_unique_id() {
        let store = StateStore::new();
        store.write_state(state("a", "sensor.a", 1));
        store.write_state(state("a", "sensor.a", 2));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().value, Some(SensorValue::Integer(2)));
        assert_eq!(store.get_by_entity_id("sensor.a").unwrap().unique_id, "a");
    }

    #[test]
    fn test_remove_and_ordering() {
        let store = StateStore::new();
        store.write_state(state("2", "sensor.b", 1));
        store.write_state(state("1", "sensor.c", 1));
        store.write_state(state("3", "sensor.a", 1));

        let ids: Vec<_> = store.all().into_iter().map(|s| s.entity_id).collect();
        assert_eq!(ids, vec!["sensor.a", "sensor.b", "sensor.c"]);

        store.remove_state("3");
        assert!(store.get("3").is_none());
        assert_eq!(store.len(), 2);
    }
}
