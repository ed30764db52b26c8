//! Sensor descriptions - one record per router reading
//!
//! Each description carries everything the host needs to render a sensor
//! (name, icon, unit, state class, precision) plus a pure function that
//! derives the sensor's value from a status snapshot.

use router_sens_types::{SensorValue, StateClass, Status, UnitOfMeasurement};
use std::fmt;

/// Derives a sensor value from a snapshot; `None` means the reading is absent
pub type ValueFn = fn(&Status) -> Option<SensorValue>;

/// Describes one router sensor
#[derive(Clone, Copy)]
pub struct RouterSensorDescription {
    /// Stable key, unique across [`SENSOR_TYPES`]
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub state_class: Option<StateClass>,
    pub native_unit_of_measurement: Option<UnitOfMeasurement>,
    pub suggested_display_precision: Option<u8>,
    pub value: ValueFn,
}

impl RouterSensorDescription {
    /// Evaluate this description against a snapshot
    pub fn value_for(&self, status: &Status) -> Option<SensorValue> {
        (self.value)(status)
    }
}

impl fmt::Debug for RouterSensorDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterSensorDescription")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("state_class", &self.state_class)
            .field("native_unit_of_measurement", &self.native_unit_of_measurement)
            .field("suggested_display_precision", &self.suggested_display_precision)
            .finish_non_exhaustive()
    }
}

fn count(value: Option<u32>) -> Option<SensorValue> {
    value.map(SensorValue::from)
}

/// Fraction (0..1) to percent; absent stays absent
fn percent(fraction: Option<f64>) -> Option<SensorValue> {
    fraction.map(|f| SensorValue::Float(f * 100.0))
}

fn text(value: &Option<String>) -> Option<SensorValue> {
    value.as_deref().map(SensorValue::from)
}

const CLIENTS_ICON: &str = "mdi:account-multiple";

/// All router sensors, in registration order
pub static SENSOR_TYPES: [RouterSensorDescription; 14] = [
    RouterSensorDescription {
        key: "guest_wifi_clients_total",
        name: "Total guest wifi clients",
        icon: CLIENTS_ICON,
        state_class: Some(StateClass::Total),
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| count(status.guest_clients_total),
    },
    RouterSensorDescription {
        key: "wifi_clients_total",
        name: "Total main wifi clients",
        icon: CLIENTS_ICON,
        state_class: Some(StateClass::Total),
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| count(status.wifi_clients_total),
    },
    RouterSensorDescription {
        key: "wired_clients_total",
        name: "Total wired clients",
        icon: CLIENTS_ICON,
        state_class: Some(StateClass::Total),
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| count(status.wired_total),
    },
    RouterSensorDescription {
        key: "iot_clients_total",
        name: "Total IoT clients",
        icon: CLIENTS_ICON,
        state_class: Some(StateClass::Total),
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| count(status.iot_clients_total),
    },
    RouterSensorDescription {
        key: "clients_total",
        name: "Total clients",
        icon: CLIENTS_ICON,
        state_class: Some(StateClass::Total),
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| count(status.clients_total),
    },
    RouterSensorDescription {
        key: "cpu_used",
        name: "CPU used",
        icon: "mdi:cpu-64-bit",
        state_class: Some(StateClass::Measurement),
        native_unit_of_measurement: Some(UnitOfMeasurement::Percentage),
        suggested_display_precision: Some(1),
        value: |status| percent(status.cpu_usage),
    },
    RouterSensorDescription {
        key: "memory_used",
        name: "Memory used",
        icon: "mdi:memory",
        state_class: Some(StateClass::Measurement),
        native_unit_of_measurement: Some(UnitOfMeasurement::Percentage),
        suggested_display_precision: Some(1),
        value: |status| percent(status.mem_usage),
    },
    RouterSensorDescription {
        key: "wan_connection_type",
        name: "WAN Connection type",
        icon: "mdi:wan",
        state_class: None,
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| text(&status.wan_connection_type),
    },
    RouterSensorDescription {
        key: "pppoe_connection_status",
        name: "PPPoe connection status",
        icon: "mdi:ethernet-cable",
        state_class: None,
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| text(&status.pppoe_connection_status),
    },
    RouterSensorDescription {
        key: "lte_connection_status",
        name: "LTE connection status",
        icon: "mdi:signal-4g",
        state_class: None,
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| text(&status.lte_connection_status),
    },
    RouterSensorDescription {
        key: "wan_ipv4_addr",
        name: "WAN IP address",
        icon: "mdi:ip-network",
        state_class: None,
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| text(&status.wan_ipv4_addr),
    },
    RouterSensorDescription {
        key: "wan_macaddr",
        name: "WAN MAC address",
        icon: "mdi:network-pos",
        state_class: None,
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| text(&status.wan_macaddr),
    },
    RouterSensorDescription {
        key: "wan_ipv4_gateway",
        name: "WAN Gateway",
        icon: "mdi:router-network",
        state_class: None,
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| text(&status.wan_ipv4_gateway),
    },
    RouterSensorDescription {
        key: "wan_dns_servers",
        name: "WAN DNS servers",
        icon: "mdi:dns",
        state_class: None,
        native_unit_of_measurement: None,
        suggested_display_precision: None,
        value: |status| text(&status.wan_dns_servers),
    },
];

/// Iterate the descriptions in table order
pub fn sensor_types() -> impl Iterator<Item = &'static RouterSensorDescription> {
    SENSOR_TYPES.iter()
}

/// Look up a description by key
pub fn find_description(key: &str) -> Option<&'static RouterSensorDescription> {
    SENSOR_TYPES.iter().find(|d| d.key == key)
}
