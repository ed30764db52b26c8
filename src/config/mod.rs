//! Configuration management

mod settings;

pub use settings::{AppConfig, PollingConfig, RouterConfig, SourceSettings, CONFIG_VERSION};
