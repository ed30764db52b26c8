//! Registry for status sources

use super::BoxedStatusSource;
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::RwLock;

/// Function that creates a status source
pub type SourceFactory = fn() -> BoxedStatusSource;

/// Registration info for a status source
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub id: String,
    pub display_name: String,
    factory: SourceFactory,
}

/// Registry for status sources
///
/// Built-in sources register themselves at startup via
/// `router_sens_sources::register_all()`.
pub struct Registry {
    sources: HashMap<String, SourceInfo>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Register a status source
    pub fn register_source(&mut self, id: &str, display_name: &str, factory: SourceFactory) {
        if self.sources.contains_key(id) {
            log::debug!("Replacing registered source {}", id);
        }
        self.sources.insert(
            id.to_string(),
            SourceInfo {
                id: id.to_string(),
                display_name: display_name.to_string(),
                factory,
            },
        );
    }

    /// Create a status source by ID
    pub fn create_source(&self, id: &str) -> Result<BoxedStatusSource> {
        let info = self
            .sources
            .get(id)
            .ok_or_else(|| anyhow!("Unknown source: {}", id))?;
        Ok((info.factory)())
    }

    /// List all registered sources, sorted by ID
    pub fn list_sources(&self) -> Vec<SourceInfo> {
        let mut infos: Vec<_> = self.sources.values().cloned().collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// Get the global registry
pub fn global_registry() -> &'static RwLock<Registry> {
    &GLOBAL_REGISTRY
}
