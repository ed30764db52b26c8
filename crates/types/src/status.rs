//! Router status snapshot

use serde::{Deserialize, Serialize};

/// One snapshot of router readings as fetched by a status source.
///
/// Every reading is optional: firmware variants report different subsets,
/// and a reading the router did not return is `None` rather than zero.
/// A snapshot is never mutated after it is published by the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    /// Clients connected to the guest wifi networks
    pub guest_clients_total: Option<u32>,
    /// Clients connected to the main wifi networks
    pub wifi_clients_total: Option<u32>,
    /// Clients connected over ethernet
    pub wired_total: Option<u32>,
    /// Clients connected to the IoT network
    pub iot_clients_total: Option<u32>,
    /// All connected clients
    pub clients_total: Option<u32>,
    /// CPU usage as a fraction (0.0 to 1.0)
    pub cpu_usage: Option<f64>,
    /// Memory usage as a fraction (0.0 to 1.0)
    pub mem_usage: Option<f64>,
    pub wan_connection_type: Option<String>,
    pub pppoe_connection_status: Option<String>,
    pub lte_connection_status: Option<String>,
    pub wan_ipv4_addr: Option<String>,
    pub wan_macaddr: Option<String>,
    pub wan_ipv4_gateway: Option<String>,
    pub wan_dns_servers: Option<String>,
}

impl Status {
    /// Parse a snapshot from the JSON status export format
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// True when the router returned no readings at all
    pub fn is_empty(&self) -> bool {
        *self == Status::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_absent() {
        let status = Status::from_json(r#"{"wired_total": 7, "cpu_usage": 0.42}"#).unwrap();
        assert_eq!(status.wired_total, Some(7));
        assert_eq!(status.cpu_usage, Some(0.42));
        assert_eq!(status.mem_usage, None);
        assert_eq!(status.wan_ipv4_addr, None);
    }

    #[test]
    fn test_explicit_null_is_absent() {
        let status = Status::from_json(r#"{"mem_usage": null, "wan_macaddr": "AA-BB-CC-DD-EE-FF"}"#)
            .unwrap();
        assert_eq!(status.mem_usage, None);
        assert_eq!(status.wan_macaddr.as_deref(), Some("AA-BB-CC-DD-EE-FF"));
    }

    #[test]
    fn test_is_empty() {
        assert!(Status::default().is_empty());
        let status = Status {
            clients_total: Some(0),
            ..Default::default()
        };
        assert!(!status.is_empty());
    }
}
