//! Shared constants

use std::time::Duration;

/// Integration domain, part of every entity's unique id
pub const DOMAIN: &str = "tplink_router";

/// Entity platform the sensors belong to
pub const PLATFORM: &str = "sensor";

pub const DEFAULT_MANUFACTURER: &str = "TP-Link";

/// Polling interval used when the configuration does not set one
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Tick of the update manager; coordinators are polled on the first tick
/// after their own interval has elapsed.
pub const UPDATE_TICK: Duration = Duration::from_millis(500);
