//! Device registry information

use serde::{Deserialize, Serialize};

/// Describes the physical router an entity belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// (domain, id) pairs identifying the device across integrations
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: Option<String>,
    pub sw_version: Option<String>,
    pub hw_version: Option<String>,
    /// Web UI of the router
    pub configuration_url: Option<String>,
}

impl DeviceInfo {
    pub fn new(
        domain: impl Into<String>,
        unique_id: impl Into<String>,
        name: impl Into<String>,
        manufacturer: impl Into<String>,
    ) -> Self {
        Self {
            identifiers: vec![(domain.into(), unique_id.into())],
            name: name.into(),
            manufacturer: manufacturer.into(),
            model: None,
            sw_version: None,
            hw_version: None,
            configuration_url: None,
        }
    }

    /// Lowercase slug of the device name, used as the entity id prefix
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        let mut last_underscore = true;
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
                last_underscore = false;
            } else if !last_underscore {
                slug.push('_');
                last_underscore = true;
            }
        }
        while slug.ends_with('_') {
            slug.pop();
        }
        slug
    }
}
