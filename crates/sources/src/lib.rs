//! router-sens-sources: Status source implementations for router-sens.

mod demo;
mod file;
mod replay;

pub use demo::{DemoSourceConfig, DemoStatusSource};
pub use file::{FileSourceConfig, FileStatusSource};
pub use replay::{StaticSourceConfig, StaticStatusSource};

/// Register all built-in sources with the global registry
pub fn register_all() {
    use router_sens_core::global_registry;

    let mut registry = match global_registry().write() {
        Ok(registry) => registry,
        Err(poisoned) => poisoned.into_inner(),
    };

    registry.register_source("file", "Status file", || Box::new(FileStatusSource::new()));
    registry.register_source("static", "Static", || Box::new(StaticStatusSource::new()));
    registry.register_source("demo", "Demo", || Box::new(DemoStatusSource::new()));

    log::debug!("Registered {} status sources", registry.list_sources().len());
}
