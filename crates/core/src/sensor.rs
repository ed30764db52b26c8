//! Router sensor entity - bridges one description to host state

use crate::constants::{DOMAIN, PLATFORM};
use crate::coordinator::{CoordinatorListener, RouterCoordinator};
use crate::description::{sensor_types, RouterSensorDescription};
use crate::state_store::StateWriter;
use chrono::Utc;
use once_cell::sync::OnceCell;
use router_sens_types::{
    DeviceInfo, EntityAttributes, EntityState, SensorValue, StateClass, UnitOfMeasurement,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Build the unique id of a sensor from its device and description key
pub fn sensor_unique_id(device_unique_id: &str, key: &str) -> String {
    format!("{}_{}_{}", device_unique_id, DOMAIN, key)
}

/// One sensor entity for one (router, description) pair
///
/// Holds no reading of its own besides the last value written to the host;
/// availability is always derived from the coordinator's current snapshot.
pub struct RouterSensor {
    coordinator: Arc<RouterCoordinator>,
    entity_description: &'static RouterSensorDescription,
    unique_id: String,
    device_info: DeviceInfo,
    native_value: Mutex<Option<SensorValue>>,
    /// Set once the host adds the entity
    writer: OnceCell<Arc<dyn StateWriter>>,
    /// Set when the host removes the entity; no state is written afterwards
    detached: AtomicBool,
}

impl RouterSensor {
    pub fn new(
        coordinator: Arc<RouterCoordinator>,
        description: &'static RouterSensorDescription,
    ) -> Self {
        let unique_id = sensor_unique_id(coordinator.unique_id(), description.key);
        let device_info = coordinator.device_info().clone();
        Self {
            coordinator,
            entity_description: description,
            unique_id,
            device_info,
            native_value: Mutex::new(None),
            writer: OnceCell::new(),
            detached: AtomicBool::new(false),
        }
    }

    pub fn entity_description(&self) -> &'static RouterSensorDescription {
        self.entity_description
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    /// Names are prefixed with the device name by the host
    pub fn has_entity_name(&self) -> bool {
        true
    }

    pub fn name(&self) -> &'static str {
        self.entity_description.name
    }

    /// Device name followed by the sensor name
    pub fn friendly_name(&self) -> String {
        format!("{} {}", self.device_info.name, self.name())
    }

    pub fn entity_id(&self) -> String {
        format!("{}.{}_{}", PLATFORM, self.device_info.slug(), self.entity_description.key)
    }

    pub fn icon(&self) -> &'static str {
        self.entity_description.icon
    }

    pub fn unit_of_measurement(&self) -> Option<UnitOfMeasurement> {
        self.entity_description.native_unit_of_measurement
    }

    pub fn state_class(&self) -> Option<StateClass> {
        self.entity_description.state_class
    }

    pub fn suggested_display_precision(&self) -> Option<u8> {
        self.entity_description.suggested_display_precision
    }

    /// Value computed at the last coordinator update
    pub fn native_value(&self) -> Option<SensorValue> {
        match self.native_value.lock() {
            Ok(value) => value.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// True when the current snapshot has a reading for this sensor
    pub fn available(&self) -> bool {
        self.entity_description
            .value_for(&self.coordinator.status())
            .is_some()
    }

    /// Called by the host once the entity is registered
    pub fn attach(&self, writer: Arc<dyn StateWriter>) -> bool {
        self.writer.set(writer).is_ok()
    }

    /// Called by the host when the entity is removed
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Current state as the host should record it
    pub fn entity_state(&self) -> EntityState {
        EntityState {
            unique_id: self.unique_id.clone(),
            entity_id: self.entity_id(),
            value: self.native_value(),
            available: self.available(),
            attributes: EntityAttributes {
                friendly_name: self.friendly_name(),
                icon: Some(self.icon().to_string()),
                unit_of_measurement: self.unit_of_measurement(),
                state_class: self.state_class(),
                suggested_display_precision: self.suggested_display_precision(),
            },
            last_updated: Utc::now(),
        }
    }

    /// Push the current state to the host, if attached and not yet removed
    pub fn write_state(&self) {
        if self.is_detached() {
            return;
        }
        if let Some(writer) = self.writer.get() {
            writer.write_state(self.entity_state());
        }
    }
}

impl CoordinatorListener for RouterSensor {
    fn handle_coordinator_update(&self) {
        let value = self
            .entity_description
            .value_for(&self.coordinator.status());
        match self.native_value.lock() {
            Ok(mut native_value) => *native_value = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
        self.write_state();
    }
}

impl std::fmt::Debug for RouterSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterSensor")
            .field("unique_id", &self.unique_id)
            .field("key", &self.entity_description.key)
            .finish_non_exhaustive()
    }
}

/// Host callback receiving new entities and whether to update them first
pub type AddEntities<'a> = dyn FnMut(Vec<Arc<RouterSensor>>, bool) + 'a;

/// Create one sensor per description for the given router
///
/// Entities are handed to the host in table order; the host subscribes them
/// to the coordinator.
pub fn setup_entry(coordinator: &Arc<RouterCoordinator>, add_entities: &mut AddEntities<'_>) {
    let sensors: Vec<Arc<RouterSensor>> = sensor_types()
        .map(|description| Arc::new(RouterSensor::new(Arc::clone(coordinator), description)))
        .collect();
    add_entities(sensors, false);
}
