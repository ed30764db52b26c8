//! Wiring between configuration, sources and the sensor platform

use crate::config::AppConfig;
use anyhow::{Context, Result};
use log::info;
use router_sens_core::{
    global_registry, sensor_types, ConfigEntry, EntityState, RouterCoordinator, SensorPlatform,
};
use std::fmt::Write as _;
use std::sync::Arc;

/// Create the configured status source and a coordinator around it
pub fn build_coordinator(config: &AppConfig) -> Result<Arc<RouterCoordinator>> {
    let source_type = &config.source.source_type;
    let registry = global_registry()
        .read()
        .map_err(|_| anyhow::anyhow!("Source registry lock poisoned"))?;
    let mut source = registry.create_source(source_type)?;
    drop(registry);
    source
        .configure(&config.source.settings)
        .with_context(|| format!("Invalid settings for source {}", source_type))?;

    info!(
        "Polling {} ({}) every {:?} using the {} source",
        config.router.name,
        config.router.unique_id(),
        config.polling.scan_interval(),
        source.metadata().name
    );

    Ok(Arc::new(RouterCoordinator::new(
        source,
        config.router.unique_id(),
        config.router.device_info(),
        config.polling.scan_interval(),
    )))
}

/// Set up an entry from async code
///
/// The first refresh fetches from the source, so it runs on the blocking pool
/// like every other refresh.
pub async fn setup_platform_entry(
    platform: &Arc<SensorPlatform>,
    entry: &ConfigEntry,
    coordinator: &Arc<RouterCoordinator>,
) -> Result<usize> {
    let platform = Arc::clone(platform);
    let entry = entry.clone();
    let coordinator = Arc::clone(coordinator);
    tokio::task::spawn_blocking(move || platform.setup_entry(&entry, coordinator))
        .await
        .context("Entry setup task failed")?
}

/// Render entity states as an aligned text table
pub fn format_states(states: &[EntityState]) -> String {
    let width = states.iter().map(|s| s.entity_id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for state in states {
        let unit = state
            .attributes
            .unit_of_measurement
            .filter(|_| state.available)
            .map(|u| format!(" {}", u))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<width$}  {}{}",
            state.entity_id,
            state.state(),
            unit,
            width = width
        );
    }
    out
}

/// Render the sensor description table
pub fn format_sensor_types() -> String {
    let mut out = String::new();
    for description in sensor_types() {
        let _ = writeln!(
            out,
            "{:<26} {:<26} {:<20} {:<12} {}",
            description.key,
            description.name,
            description.icon,
            description
                .state_class
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            description
                .native_unit_of_measurement
                .map(|u| u.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    out
}

/// Print the states currently recorded by the platform
pub fn print_states(platform: &SensorPlatform) {
    print!("{}", format_states(&platform.store().all()));
}
