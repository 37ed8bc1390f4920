//! Runtime settings for the idle watcher.

use std::time::Duration;

/// Configuration for [`crate::monitor::spawn_idle_watch`].
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// How often to sample the idle time (default: 1s).
    pub poll_interval: Duration,

    /// Idle time after which the user counts as away (default: 5 minutes).
    pub idle_threshold: Duration,
}

impl WatchConfig {
    /// Smallest accepted poll interval. `GetTickCount64` only advances every
    /// 10-16ms, so polling faster gains nothing.
    pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(16);

    pub fn new(poll_interval: Duration, idle_threshold: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(Self::MIN_POLL_INTERVAL),
            idle_threshold,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            idle_threshold: Duration::from_secs(5 * 60),
        }
    }
}
