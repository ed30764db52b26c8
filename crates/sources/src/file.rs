//! File-backed status source
//!
//! Reads a JSON status export (as written by an external router client)
//! from disk on every fetch.

use router_sens_core::{SourceError, SourceMetadata, Status, StatusSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the file source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSourceConfig {
    /// Path of the JSON status export
    pub path: Option<PathBuf>,
}

/// Status source reading a JSON export from disk
pub struct FileStatusSource {
    metadata: SourceMetadata,
    config: FileSourceConfig,
}

impl FileStatusSource {
    pub fn new() -> Self {
        Self {
            metadata: SourceMetadata {
                id: "file".to_string(),
                name: "Status file".to_string(),
                description: "Router status read from a JSON export on disk".to_string(),
                default_interval: Duration::from_secs(30),
            },
            config: FileSourceConfig::default(),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let mut source = Self::new();
        source.config.path = Some(path.into());
        source
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.config.path.as_ref()
    }
}

impl Default for FileStatusSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSource for FileStatusSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fetch_status(&mut self) -> Result<Status, SourceError> {
        let path = self
            .config
            .path
            .as_ref()
            .ok_or_else(|| SourceError::Config("no status file configured".to_string()))?;

        let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let status = Status::from_json(&content)?;
        log::trace!("Read status from {}", path.display());
        Ok(status)
    }

    fn configure(&mut self, settings: &HashMap<String, Value>) -> Result<(), SourceError> {
        if let Some(path) = settings.get("path") {
            let path = path
                .as_str()
                .ok_or_else(|| SourceError::Config("`path` must be a string".to_string()))?;
            self.config.path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "router-sens-{}-{}.json",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_reads_status_export() {
        let path = temp_file("read", r#"{"clients_total": 9, "wan_ipv4_addr": "203.0.113.7"}"#);
        let mut source = FileStatusSource::with_path(&path);

        let status = source.fetch_status().unwrap();
        assert_eq!(status.clients_total, Some(9));
        assert_eq!(status.wan_ipv4_addr.as_deref(), Some("203.0.113.7"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_configure_sets_path() {
        let mut source = FileStatusSource::new();
        let mut settings = HashMap::new();
        settings.insert("path".to_string(), Value::from("/tmp/status.json"));
        source.configure(&settings).unwrap();
        assert_eq!(source.path(), Some(&PathBuf::from("/tmp/status.json")));

        settings.insert("path".to_string(), Value::from(3));
        assert!(matches!(source.configure(&settings), Err(SourceError::Config(_))));
    }

    #[test]
    fn test_missing_path_is_config_error() {
        let mut source = FileStatusSource::new();
        assert!(matches!(source.fetch_status(), Err(SourceError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut source = FileStatusSource::with_path("/nonexistent/router-sens/status.json");
        assert!(matches!(source.fetch_status(), Err(SourceError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = temp_file("malformed", "{ not json");
        let mut source = FileStatusSource::with_path(&path);
        assert!(matches!(source.fetch_status(), Err(SourceError::Parse(_))));
        std::fs::remove_file(path).ok();
    }
}
