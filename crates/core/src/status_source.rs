//! Status source trait and related types

use router_sens_types::Status;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Metadata about a status source
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Unique identifier for this source type
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of where this source gets its readings
    pub description: String,
    /// Recommended polling interval
    pub default_interval: Duration,
}

/// Errors raised while fetching a status snapshot
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed status: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid source configuration: {0}")]
    Config(String),
    #[error("no more status snapshots to replay")]
    Exhausted,
    #[error("status source lock poisoned")]
    LockPoisoned,
}

/// Trait for everything that can produce router status snapshots
///
/// Implementations perform the actual I/O (talking to the router, reading an
/// export, synthesising data). They are driven by a
/// [`RouterCoordinator`](crate::RouterCoordinator), never by sensors.
pub trait StatusSource: Send {
    /// Get metadata about this source
    fn metadata(&self) -> &SourceMetadata;

    /// Fetch a fresh snapshot
    fn fetch_status(&mut self) -> Result<Status, SourceError>;

    /// Configure the source with source-specific settings
    fn configure(&mut self, _settings: &HashMap<String, Value>) -> Result<(), SourceError> {
        Ok(())
    }
}

/// Type-erased status source for dynamic dispatch
pub type BoxedStatusSource = Box<dyn StatusSource>;
