//! Bridge configuration.

use std::time::Duration;

use crate::bus::DEFAULT_QUIET_PERIOD;
use crate::store::DEFAULT_LOG_CAPACITY;

pub const DEFAULT_HEARTBEAT_WINDOW: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// How long an operation may go without a heartbeat before it is treated
    /// as dead and auto-cancelled.
    pub heartbeat_window: Duration,
    /// Maximum retained log entries before FIFO eviction.
    pub log_capacity: usize,
    /// Quiet period for coalescing backend change notifications.
    pub debounce_window: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            heartbeat_window: DEFAULT_HEARTBEAT_WINDOW,
            log_capacity: DEFAULT_LOG_CAPACITY,
            debounce_window: DEFAULT_QUIET_PERIOD,
        }
    }
}

impl BridgeConfig {
    /// Defaults overridden by `ATELIER_HEARTBEAT_MS`, `ATELIER_LOG_CAPACITY`
    /// and `ATELIER_DEBOUNCE_MS`, loading a `.env` file first if one exists.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        if let Some(ms) = read_env("ATELIER_HEARTBEAT_MS") {
            config.heartbeat_window = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_env("ATELIER_LOG_CAPACITY") {
            config.log_capacity = capacity as usize;
        }
        if let Some(ms) = read_env("ATELIER_DEBOUNCE_MS") {
            config.debounce_window = Duration::from_millis(ms);
        }
        config
    }
}

fn read_env(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring unparsable {name}={raw}");
            None
        }
    }
}
