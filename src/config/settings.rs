//! Application and router configuration

use anyhow::Result;
use router_sens_core::{DeviceInfo, DEFAULT_MANUFACTURER, DEFAULT_SCAN_INTERVAL, DOMAIN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// The router being monitored
    #[serde(default)]
    pub router: RouterConfig,
    /// Polling settings
    #[serde(default)]
    pub polling: PollingConfig,
    /// Where status snapshots come from
    #[serde(default)]
    pub source: SourceSettings,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "github.router_sens", "router-sens")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            router: RouterConfig::default(),
            polling: PollingConfig::default(),
            source: SourceSettings::default(),
        }
    }
}

/// Router identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Address of the router's web interface
    pub host: String,
    /// Stable device identifier; defaults to the host
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default = "default_router_name")]
    pub name: String,
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub hardware_version: Option<String>,
}

fn default_router_name() -> String {
    "TP-Link Router".to_string()
}

fn default_manufacturer() -> String {
    DEFAULT_MANUFACTURER.to_string()
}

impl RouterConfig {
    pub fn unique_id(&self) -> &str {
        self.unique_id.as_deref().unwrap_or(&self.host)
    }

    /// Device registry entry for this router
    pub fn device_info(&self) -> DeviceInfo {
        let mut info = DeviceInfo::new(DOMAIN, self.unique_id(), &self.name, &self.manufacturer);
        info.model = self.model.clone();
        info.sw_version = self.firmware_version.clone();
        info.hw_version = self.hardware_version.clone();
        info.configuration_url = Some(if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        });
        info
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.1".to_string(),
            unique_id: None,
            name: default_router_name(),
            manufacturer: default_manufacturer(),
            model: None,
            firmware_version: None,
            hardware_version: None,
        }
    }
}

/// Polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,
}

fn default_scan_interval_secs() -> u64 {
    DEFAULT_SCAN_INTERVAL.as_secs()
}

impl PollingConfig {
    /// Scan interval, never shorter than one second
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval_secs(),
        }
    }
}

/// Status source selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Registered source id (e.g., "file", "static", "demo")
    pub source_type: String,
    /// Source-specific settings passed to `StatusSource::configure`
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            source_type: "demo".to_string(),
            settings: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.router.host, "192.168.1.1");
        assert_eq!(config.polling.scan_interval(), DEFAULT_SCAN_INTERVAL);
        assert_eq!(config.source.source_type, "demo");
    }

    #[test]
    fn test_unique_id_falls_back_to_host() {
        let mut router = RouterConfig::default();
        assert_eq!(router.unique_id(), "192.168.1.1");
        router.unique_id = Some("mr600-1".to_string());
        assert_eq!(router.unique_id(), "mr600-1");
    }

    #[test]
    fn test_device_info() {
        let router = RouterConfig {
            model: Some("Archer MR600".to_string()),
            ..Default::default()
        };
        let info = router.device_info();
        assert_eq!(info.identifiers, vec![(DOMAIN.to_string(), "192.168.1.1".to_string())]);
        assert_eq!(info.manufacturer, "TP-Link");
        assert_eq!(info.model.as_deref(), Some("Archer MR600"));
        assert_eq!(info.configuration_url.as_deref(), Some("http://192.168.1.1"));
    }

    #[test]
    fn test_scan_interval_floor() {
        let polling = PollingConfig {
            scan_interval_secs: 0,
        };
        assert_eq!(polling.scan_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("router-sens-config-{}", std::process::id()))
            .join("config.json");
        let mut config = AppConfig::default();
        config.router.name = "Attic".to_string();
        config.source.source_type = "file".to_string();
        config
            .source
            .settings
            .insert("path".to_string(), serde_json::Value::from("/tmp/status.json"));

        config.save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();

        assert_eq!(loaded.router.name, "Attic");
        assert_eq!(loaded.source.source_type, "file");
        assert_eq!(loaded.source.settings["path"], "/tmp/status.json");

        if let Some(parent) = path.parent() {
            std::fs::remove_dir_all(parent).ok();
        }
    }
}
