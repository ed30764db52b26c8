//! router-sens-core: Core traits and machinery for router-sens.
//!
//! This crate contains the StatusSource trait, the source Registry, the
//! polling coordinator, the sensor description table and the sensor entity
//! that bridges the two to host-managed state.

pub mod constants;
mod coordinator;
mod description;
mod platform;
mod registry;
mod sensor;
mod state_store;
mod status_source;
mod update_manager;

pub use constants::{DEFAULT_MANUFACTURER, DEFAULT_SCAN_INTERVAL, DOMAIN, PLATFORM, UPDATE_TICK};
pub use coordinator::{CoordinatorListener, ListenerId, RouterCoordinator};
pub use description::{find_description, sensor_types, RouterSensorDescription, ValueFn, SENSOR_TYPES};
pub use platform::{ConfigEntry, SensorPlatform};
pub use registry::{global_registry, Registry, SourceFactory, SourceInfo};
pub use sensor::{sensor_unique_id, setup_entry, AddEntities, RouterSensor};
pub use state_store::{StateStore, StateWriter};
pub use status_source::{BoxedStatusSource, SourceError, SourceMetadata, StatusSource};
pub use update_manager::UpdateManager;

// Re-export types used in trait signatures for convenience
pub use router_sens_types::{DeviceInfo, EntityState, SensorValue, StateClass, Status};
