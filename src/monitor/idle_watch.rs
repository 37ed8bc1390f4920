//! Idle watcher thread and presence tracking.

use serde::Serialize;
use std::time::Duration;

/// Whether the user is at the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Active,
    Away,
}

/// Folds idle durations into [`Presence`] transitions.
#[derive(Debug, Clone)]
pub struct PresenceTracker {
    threshold: Duration,
    current: Option<Presence>,
}

impl PresenceTracker {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            current: None,
        }
    }

    pub fn current(&self) -> Option<Presence> {
        self.current
    }

    /// Records an idle duration. Returns the new presence when it differs
    /// from the previous one (the first observation always counts).
    pub fn update(&mut self, idle: Duration) -> Option<Presence> {
        let presence = if idle >= self.threshold {
            Presence::Away
        } else {
            Presence::Active
        };

        if self.current == Some(presence) {
            return None;
        }
        self.current = Some(presence);
        Some(presence)
    }
}

#[cfg(windows)]
pub use native::*;

#[cfg(windows)]
mod native {
    use super::*;
    use crate::config::WatchConfig;
    use crate::idle;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};

    /// Spawns the idle watching thread.
    ///
    /// The thread samples the idle time every `config.poll_interval` and
    /// logs each transition between [`Presence::Active`] and
    /// [`Presence::Away`]. Failed samples are logged and skipped. It exits
    /// once `shutdown` is set.
    ///
    /// # Example
    /// ```no_run
    /// use memtools::config::WatchConfig;
    /// use memtools::monitor::spawn_idle_watch;
    /// use std::sync::atomic::{AtomicBool, Ordering};
    /// use std::sync::Arc;
    ///
    /// let shutdown = Arc::new(AtomicBool::new(false));
    /// let handle = spawn_idle_watch(Arc::clone(&shutdown), WatchConfig::default());
    ///
    /// shutdown.store(true, Ordering::SeqCst);
    /// handle.join().unwrap();
    /// ```
    pub fn spawn_idle_watch(shutdown: Arc<AtomicBool>, config: WatchConfig) -> JoinHandle<()> {
        thread::spawn(move || {
            tracing::info!(
                interval_ms = config.poll_interval.as_millis() as u64,
                threshold_secs = config.idle_threshold.as_secs(),
                "Idle watch thread started"
            );

            let mut tracker = PresenceTracker::new(config.idle_threshold);

            while !shutdown.load(Ordering::SeqCst) {
                match idle::sample() {
                    Ok(sample) => {
                        if let Some(presence) = tracker.update(sample.idle()) {
                            tracing::info!(
                                ?presence,
                                idle_secs = sample.idle().as_secs(),
                                last_input = %sample.last_input_at().to_rfc3339(),
                                "Presence changed"
                            );
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Idle sample failed"),
                }

                thread::sleep(config.poll_interval);
            }

            tracing::info!("Idle watch thread shutting down");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_reports_state() {
        let mut tracker = PresenceTracker::new(Duration::from_secs(60));
        assert_eq!(tracker.current(), None);
        assert_eq!(tracker.update(Duration::from_secs(1)), Some(Presence::Active));
        assert_eq!(tracker.current(), Some(Presence::Active));
    }

    #[test]
    fn test_only_transitions_are_reported() {
        let mut tracker = PresenceTracker::new(Duration::from_secs(60));
        tracker.update(Duration::from_secs(1));

        assert_eq!(tracker.update(Duration::from_secs(30)), None);
        assert_eq!(tracker.update(Duration::from_secs(60)), Some(Presence::Away));
        assert_eq!(tracker.update(Duration::from_secs(120)), None);
        assert_eq!(tracker.update(Duration::ZERO), Some(Presence::Active));
    }

    #[test]
    fn test_presence_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Presence::Away).unwrap(), "\"away\"");
    }

    #[cfg(windows)]
    #[test]
    fn test_watch_thread_stops_on_shutdown() {
        use crate::config::WatchConfig;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let shutdown = Arc::new(AtomicBool::new(false));
        let config = WatchConfig::new(Duration::from_millis(20), Duration::from_secs(60));
        let handle = spawn_idle_watch(Arc::clone(&shutdown), config);

        std::thread::sleep(Duration::from_millis(60));
        shutdown.store(true, Ordering::SeqCst);
        handle.join().unwrap();
    }
}
