//! router-sens-types: Shared data types for router-sens.
//!
//! This crate contains pure data types (status snapshots, sensor values,
//! device and entity records) that are shared across all router-sens crates.

pub mod device;
pub mod entity;
pub mod status;
pub mod value;

// Re-export commonly used types at the crate root for convenience
pub use device::DeviceInfo;
pub use entity::{EntityAttributes, EntityState, STATE_UNAVAILABLE};
pub use status::Status;
pub use value::{SensorValue, StateClass, UnitOfMeasurement};
