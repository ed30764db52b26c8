//! Demo status source for debugging and demonstration
//!
//! Synthesises plausible router readings. CPU and memory readings drop out
//! now and then so unavailable sensors can be observed too.

use rand::Rng;
use router_sens_core::{SourceError, SourceMetadata, Status, StatusSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for the demo source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSourceConfig {
    /// Probability (0.0 to 1.0) that a CPU or memory reading is missing
    #[serde(default = "default_dropout")]
    pub dropout: f64,
    /// Upper bound for each client category
    #[serde(default = "default_max_clients")]
    pub max_clients: u32,
    #[serde(default = "default_connection_type")]
    pub wan_connection_type: String,
}

fn default_dropout() -> f64 {
    0.1
}

/// Largest `max_clients` whose four categories still sum within `u32`
pub const MAX_CLIENTS_LIMIT: u32 = u32::MAX / 4;

fn default_max_clients() -> u32 {
    12
}

fn default_connection_type() -> String {
    "dhcp".to_string()
}

impl Default for DemoSourceConfig {
    fn default() -> Self {
        Self {
            dropout: default_dropout(),
            max_clients: default_max_clients(),
            wan_connection_type: default_connection_type(),
        }
    }
}

/// Demo status source
pub struct DemoStatusSource {
    metadata: SourceMetadata,
    config: DemoSourceConfig,
    /// Last CPU reading, drifted on each fetch
    cpu: f64,
    mem: f64,
}

impl DemoStatusSource {
    pub fn new() -> Self {
        Self {
            metadata: SourceMetadata {
                id: "demo".to_string(),
                name: "Demo".to_string(),
                description: "Synthetic router readings for debugging and demonstration"
                    .to_string(),
                default_interval: Duration::from_secs(2),
            },
            config: DemoSourceConfig::default(),
            cpu: 0.2,
            mem: 0.5,
        }
    }

    pub fn set_config(&mut self, config: DemoSourceConfig) {
        self.config = config;
    }

    pub fn get_config(&self) -> &DemoSourceConfig {
        &self.config
    }

    /// Random walk clamped to 0..1
    fn drift(rng: &mut impl Rng, value: f64) -> f64 {
        (value + rng.gen_range(-0.05..=0.05)).clamp(0.0, 1.0)
    }

    fn maybe<T>(rng: &mut impl Rng, dropout: f64, value: T) -> Option<T> {
        if rng.gen_bool(dropout) {
            None
        } else {
            Some(value)
        }
    }
}

impl Default for DemoStatusSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSource for DemoStatusSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fetch_status(&mut self) -> Result<Status, SourceError> {
        let mut rng = rand::thread_rng();
        let dropout = self.config.dropout.clamp(0.0, 1.0);
        let max = self.config.max_clients;

        self.cpu = Self::drift(&mut rng, self.cpu);
        self.mem = Self::drift(&mut rng, self.mem);

        let guest = rng.gen_range(0..=max);
        let wifi = rng.gen_range(0..=max);
        let wired = rng.gen_range(0..=max);
        let iot = rng.gen_range(0..=max);

        Ok(Status {
            guest_clients_total: Some(guest),
            wifi_clients_total: Some(wifi),
            wired_total: Some(wired),
            iot_clients_total: Some(iot),
            clients_total: Some(
                guest
                    .saturating_add(wifi)
                    .saturating_add(wired)
                    .saturating_add(iot),
            ),
            cpu_usage: Self::maybe(&mut rng, dropout, self.cpu),
            mem_usage: Self::maybe(&mut rng, dropout, self.mem),
            wan_connection_type: Some(self.config.wan_connection_type.clone()),
            pppoe_connection_status: None,
            lte_connection_status: None,
            wan_ipv4_addr: Some("203.0.113.7".to_string()),
            wan_macaddr: Some("00-11-22-33-44-55".to_string()),
            wan_ipv4_gateway: Some("203.0.113.1".to_string()),
            wan_dns_servers: Some("203.0.113.53".to_string()),
        })
    }

    fn configure(&mut self, settings: &HashMap<String, Value>) -> Result<(), SourceError> {
        if let Some(demo_config) = settings.get("demo_config") {
            let config = serde_json::from_value::<DemoSourceConfig>(demo_config.clone())
                .map_err(|e| SourceError::Config(e.to_string()))?;
            if config.max_clients > MAX_CLIENTS_LIMIT {
                return Err(SourceError::Config(format!(
                    "max_clients {} exceeds {}",
                    config.max_clients, MAX_CLIENTS_LIMIT
                )));
            }
            self.set_config(config);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_are_in_range() {
        let mut source = DemoStatusSource::new();
        for _ in 0..50 {
            let status = source.fetch_status().unwrap();
            let max = source.get_config().max_clients;
            assert!(status.wired_total.unwrap() <= max);
            assert_eq!(
                status.clients_total.unwrap(),
                status.guest_clients_total.unwrap()
                    + status.wifi_clients_total.unwrap()
                    + status.wired_total.unwrap()
                    + status.iot_clients_total.unwrap()
            );
            if let Some(cpu) = status.cpu_usage {
                assert!((0.0..=1.0).contains(&cpu));
            }
        }
    }

    #[test]
    fn test_full_dropout_removes_cpu_and_memory() {
        let mut source = DemoStatusSource::new();
        source.set_config(DemoSourceConfig {
            dropout: 1.0,
            ..Default::default()
        });
        let status = source.fetch_status().unwrap();
        assert_eq!(status.cpu_usage, None);
        assert_eq!(status.mem_usage, None);
        assert!(status.clients_total.is_some());
    }

    #[test]
    fn test_zero_dropout_keeps_readings() {
        let mut source = DemoStatusSource::new();
        let mut settings = HashMap::new();
        settings.insert("demo_config".to_string(), serde_json::json!({"dropout": 0.0}));
        source.configure(&settings).unwrap();

        let status = source.fetch_status().unwrap();
        assert!(status.cpu_usage.is_some());
        assert!(status.mem_usage.is_some());
        assert_eq!(source.get_config().max_clients, 12);
    }

    #[test]
    fn test_configure_rejects_oversized_max_clients() {
        let mut source = DemoStatusSource::new();
        let mut settings = HashMap::new();
        settings.insert(
            "demo_config".to_string(),
            serde_json::json!({"max_clients": 4_000_000_000u32}),
        );

        assert!(matches!(
            source.configure(&settings),
            Err(SourceError::Config(_))
        ));
        assert_eq!(source.get_config().max_clients, 12);
    }

    #[test]
    fn test_client_total_saturates() {
        let mut source = DemoStatusSource::new();
        source.set_config(DemoSourceConfig {
            max_clients: u32::MAX,
            ..Default::default()
        });
        for _ in 0..20 {
            let status = source.fetch_status().unwrap();
            let total = status.clients_total.unwrap();
            assert!(total >= status.wired_total.unwrap());
            assert!(total >= status.guest_clients_total.unwrap());
        }
    }
}
