use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use router_sens::app::{build_coordinator, format_sensor_types, print_states, setup_platform_entry};
use router_sens::config::AppConfig;
use router_sens_core::{ConfigEntry, SensorPlatform, StateStore, UpdateManager, UPDATE_TICK};
use std::path::PathBuf;
use std::sync::Arc;

/// router-sens - TP-Link router telemetry as sensor entities
#[derive(Parser, Debug, Clone)]
#[command(name = "router-sens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Status source to use (overrides the configuration)
    #[arg(short = 's', long = "source", value_name = "ID")]
    source: Option<String>,

    /// Read status snapshots from a JSON export (implies --source file)
    #[arg(long = "status-file", value_name = "FILE")]
    status_file: Option<PathBuf>,

    /// Polling interval in seconds (overrides the configuration)
    #[arg(short = 'i', long = "interval", value_name = "SECS")]
    interval: Option<u64>,

    /// Refresh once, print the sensor states and exit
    #[arg(long = "once")]
    once: bool,

    /// List the sensors and exit
    #[arg(long = "list-sensors")]
    list_sensors: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

fn load_config(cli: &Cli) -> AppConfig {
    let mut config = match &cli.config {
        Some(path) => match AppConfig::load_from_path(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load config file '{}': {}", path.display(), e);
                AppConfig::default()
            }
        },
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }),
    };

    if let Some(source) = &cli.source {
        config.source.source_type = source.clone();
    }
    if let Some(path) = &cli.status_file {
        config.source.source_type = "file".to_string();
        config.source.settings.insert(
            "path".to_string(),
            serde_json::Value::from(path.display().to_string()),
        );
    }
    if let Some(secs) = cli.interval {
        config.polling.scan_interval_secs = secs;
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if cli.list_sensors {
        print!("{}", format_sensor_types());
        return Ok(());
    }

    router_sens_sources::register_all();

    let config = load_config(&cli);
    let coordinator = build_coordinator(&config)?;

    let platform = Arc::new(SensorPlatform::new(Arc::new(StateStore::new())));
    let entry = ConfigEntry::new(config.router.name.clone());
    setup_platform_entry(&platform, &entry, &coordinator).await?;

    if cli.once {
        print_states(&platform);
        platform.unload_entry(&entry.entry_id);
        return Ok(());
    }

    let manager = UpdateManager::new();
    manager
        .add_coordinator(entry.entry_id.clone(), coordinator, true)
        .await;

    let printer = Arc::clone(&platform);
    let scan_interval = config.polling.scan_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(scan_interval);
        loop {
            interval.tick().await;
            print_states(&printer);
            println!();
        }
    });

    tokio::select! {
        _ = manager.run(UPDATE_TICK) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    platform.unload_entry(&entry.entry_id);
    Ok(())
}
