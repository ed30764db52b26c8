//! Static status source - replays a fixed list of snapshots

use router_sens_core::{SourceError, SourceMetadata, Status, StatusSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for the static source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticSourceConfig {
    /// Snapshots handed out in order
    #[serde(default)]
    pub snapshots: Vec<Status>,
    /// Keep returning the last snapshot once the list is exhausted
    #[serde(default = "default_repeat_last")]
    pub repeat_last: bool,
}

fn default_repeat_last() -> bool {
    true
}

impl Default for StaticSourceConfig {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            repeat_last: true,
        }
    }
}

/// Status source replaying configured snapshots
pub struct StaticStatusSource {
    metadata: SourceMetadata,
    config: StaticSourceConfig,
    position: usize,
}

impl StaticStatusSource {
    pub fn new() -> Self {
        Self {
            metadata: SourceMetadata {
                id: "static".to_string(),
                name: "Static".to_string(),
                description: "Replays a fixed list of status snapshots".to_string(),
                default_interval: Duration::from_secs(5),
            },
            config: StaticSourceConfig::default(),
            position: 0,
        }
    }

    pub fn with_snapshots(snapshots: Vec<Status>) -> Self {
        let mut source = Self::new();
        source.set_config(StaticSourceConfig {
            snapshots,
            ..Default::default()
        });
        source
    }

    /// Replace the configuration and restart from the first snapshot
    pub fn set_config(&mut self, config: StaticSourceConfig) {
        self.config = config;
        self.position = 0;
    }

    pub fn get_config(&self) -> &StaticSourceConfig {
        &self.config
    }
}

impl Default for StaticStatusSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSource for StaticStatusSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fetch_status(&mut self) -> Result<Status, SourceError> {
        let snapshots = &self.config.snapshots;
        if let Some(status) = snapshots.get(self.position) {
            self.position += 1;
            return Ok(status.clone());
        }

        match snapshots.last() {
            Some(last) if self.config.repeat_last => Ok(last.clone()),
            _ => Err(SourceError::Exhausted),
        }
    }

    fn configure(&mut self, settings: &HashMap<String, Value>) -> Result<(), SourceError> {
        if let Some(static_config) = settings.get("static_config") {
            let config = serde_json::from_value::<StaticSourceConfig>(static_config.clone())
                .map_err(|e| SourceError::Config(e.to_string()))?;
            self.set_config(config);
        }
        Ok(())
    }
}
