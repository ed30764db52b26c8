//! router-sens: TP-Link router telemetry exposed as sensor entities
//!
//! This library ties the workspace together:
//! - Configuration management
//! - Building coordinators from configured status sources
//! - Rendering recorded entity states

pub mod app;
pub mod config;

// Re-export commonly used types
pub use config::AppConfig;
pub use router_sens_core::{RouterCoordinator, RouterSensor, SensorPlatform, StateStore};
