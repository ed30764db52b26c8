//! Entity state as recorded by the host

use crate::value::{SensorValue, StateClass, UnitOfMeasurement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State string the host records for an entity without a value
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// Display attributes that accompany an entity's state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAttributes {
    pub friendly_name: String,
    pub icon: Option<String>,
    pub unit_of_measurement: Option<UnitOfMeasurement>,
    pub state_class: Option<StateClass>,
    pub suggested_display_precision: Option<u8>,
}

/// One entity's state as last written to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub unique_id: String,
    pub entity_id: String,
    /// `None` when the entity is unavailable
    pub value: Option<SensorValue>,
    pub available: bool,
    pub attributes: EntityAttributes,
    pub last_updated: DateTime<Utc>,
}

impl EntityState {
    /// The state as the host displays it
    pub fn state(&self) -> String {
        match (&self.value, self.available) {
            (Some(value), true) => {
                value.format_with_precision(self.attributes.suggested_display_precision)
            }
            _ => STATE_UNAVAILABLE.to_string(),
        }
    }
}
