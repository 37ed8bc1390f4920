//! User idle time.
//!
//! Windows records the tick count (milliseconds since boot) of the last
//! keyboard or mouse event, system wide. That tick is a 32-bit value and
//! wraps every 2^32 ms (about 49.7 days), so it is never compared against a
//! wall clock directly. Instead the elapsed time is taken against the low 32
//! bits of the 64-bit tick counter with wrapping arithmetic, which stays
//! correct across the wrap for any idle period shorter than the wrap period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Length of one cycle of the 32-bit tick counter.
pub const TICK_WRAP_PERIOD: Duration = Duration::from_millis(1 << 32);

/// A last-input tick up to this far ahead of the clock is read skew, not a
/// 49-day idle period.
const SKEW_TOLERANCE_MS: u32 = 1_000;

/// Milliseconds between `last_input_tick` and `now_tick`, wrap-aware.
///
/// Exact for any gap shorter than [`TICK_WRAP_PERIOD`]; longer gaps are
/// reported modulo the period.
///
/// A last-input tick slightly ahead of `now_tick` (input landed between the
/// two reads) yields 0.
pub fn elapsed_ticks(now_tick: u64, last_input_tick: u32) -> u32 {
    let elapsed = (now_tick as u32).wrapping_sub(last_input_tick);
    if elapsed > u32::MAX - SKEW_TOLERANCE_MS {
        0
    } else {
        elapsed
    }
}

/// Wall-clock time at which the tick counter was zero.
pub fn boot_time_at(now: DateTime<Utc>, now_tick: u64) -> DateTime<Utc> {
    let since_boot = i64::try_from(now_tick)
        .ok()
        .and_then(chrono::Duration::try_milliseconds);
    since_boot
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// One observation of the input clock.
///
/// All derived values come from the same three readings, so `idle()` and
/// `last_input_at()` always agree with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleSample {
    /// Tick of the last input event (32-bit, wrapping).
    pub last_input_tick: u32,
    /// 64-bit tick count read right after `last_input_tick`.
    pub now_tick: u64,
    /// Wall clock read right after `now_tick`.
    pub observed_at: DateTime<Utc>,
}

impl IdleSample {
    /// Time since the last input event. Never negative.
    pub fn idle(&self) -> Duration {
        Duration::from_millis(u64::from(elapsed_ticks(self.now_tick, self.last_input_tick)))
    }

    /// Wall-clock time of the last input event.
    pub fn last_input_at(&self) -> DateTime<Utc> {
        let elapsed = elapsed_ticks(self.now_tick, self.last_input_tick);
        self.observed_at - chrono::Duration::milliseconds(i64::from(elapsed))
    }

    /// Wall-clock time the system booted, as seen from this sample.
    pub fn boot_time(&self) -> DateTime<Utc> {
        boot_time_at(self.observed_at, self.now_tick)
    }

    /// True when the user has been idle for at least `threshold`.
    pub fn is_idle(&self, threshold: Duration) -> bool {
        self.idle() >= threshold
    }
}

#[cfg(windows)]
pub use native::*;

#[cfg(windows)]
mod native {
    use super::*;
    use crate::error::{Error, Result};
    use crate::winapi_utils::{get_last_input_tick, get_tick_count};

    /// Tick count of the last system-wide input event.
    ///
    /// Fails with [`Error::QueryFailed`] when the OS rejects the query, rather
    /// than handing back whatever the output buffer held.
    pub fn last_input_tick_count() -> Result<u32> {
        get_last_input_tick().ok_or_else(|| {
            tracing::warn!("GetLastInputInfo failed");
            Error::QueryFailed {
                call: "GetLastInputInfo",
            }
        })
    }

    /// Reads the last-input tick, the tick counter and the wall clock, in
    /// that order.
    pub fn sample() -> Result<IdleSample> {
        let last_input_tick = last_input_tick_count()?;
        let now_tick = get_tick_count();
        let observed_at = Utc::now();

        let sample = IdleSample {
            last_input_tick,
            now_tick,
            observed_at,
        };
        tracing::trace!(
            last_input_tick,
            now_tick,
            idle_ms = sample.idle().as_millis() as u64,
            "Idle sample"
        );
        Ok(sample)
    }

    /// Wall-clock time of the last system-wide input event.
    ///
    /// # Example
    /// ```no_run
    /// let last = memtools::idle::last_input_timestamp()?;
    /// println!("last input at {}", last.to_rfc3339());
    /// # Ok::<(), memtools::Error>(())
    /// ```
    pub fn last_input_timestamp() -> Result<DateTime<Utc>> {
        sample().map(|s| s.last_input_at())
    }

    /// How long the system has been idle.
    pub fn idle_duration() -> Result<Duration> {
        sample().map(|s| s.idle())
    }

    /// Wall-clock time the system booted.
    pub fn boot_time() -> DateTime<Utc> {
        boot_time_at(Utc::now(), get_tick_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_elapsed_without_wrap() {
        assert_eq!(elapsed_ticks(10_000, 4_000), 6_000);
        assert_eq!(elapsed_ticks(10_000, 10_000), 0);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        // Last input 100ms before the 32-bit counter wrapped, now 250ms after.
        let last = u32::MAX - 99;
        let now = (1u64 << 32) + 250;
        assert_eq!(elapsed_ticks(now, last), 350);
    }

    #[test]
    fn test_elapsed_after_several_wraps() {
        let now = 3 * (1u64 << 32) + 5_000;
        assert_eq!(elapsed_ticks(now, 2_000), 3_000);
    }

    #[test]
    fn test_input_slightly_ahead_clamps_to_zero() {
        assert_eq!(elapsed_ticks(10_000, 10_005), 0);
        assert_eq!(elapsed_ticks(10_000, 10_000 + SKEW_TOLERANCE_MS), 0);
    }

    #[test]
    fn test_long_idle_is_not_mistaken_for_skew() {
        let thirty_days_ms = 30 * 24 * 3_600 * 1_000u32;
        let now = 40 * 24 * 3_600 * 1_000u64;
        let last = (now - u64::from(thirty_days_ms)) as u32;
        assert_eq!(elapsed_ticks(now, last), thirty_days_ms);
    }

    #[test]
    fn test_gap_of_one_full_period_folds_to_zero() {
        let period_ms = TICK_WRAP_PERIOD.as_millis() as u64;
        assert_eq!(period_ms, 1u64 << 32);
        assert_eq!(elapsed_ticks(period_ms + 7_000, 7_000), 0);
        // Two seconds short of a full period.
        assert_eq!(elapsed_ticks(period_ms + 5_000, 7_000), u32::MAX - 1_999);
    }

    #[test]
    fn test_boot_time() {
        assert_eq!(boot_time_at(at(1_000_000), 60_000), at(999_940));
        assert_eq!(boot_time_at(at(1_000_000), u64::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_sample_derivations() {
        let sample = IdleSample {
            last_input_tick: 50_000,
            now_tick: 80_000,
            observed_at: at(1_700_000_000),
        };
        assert_eq!(sample.idle(), Duration::from_secs(30));
        assert_eq!(sample.last_input_at(), at(1_700_000_000 - 30));
        assert_eq!(sample.boot_time(), at(1_700_000_000 - 80));
        assert!(sample.is_idle(Duration::from_secs(30)));
        assert!(!sample.is_idle(Duration::from_secs(31)));
    }

    #[test]
    fn test_last_input_matches_boot_plus_tick_before_wrap() {
        let sample = IdleSample {
            last_input_tick: 123_456,
            now_tick: 987_654,
            observed_at: at(1_700_000_000),
        };
        let from_boot = sample.boot_time() + chrono::Duration::milliseconds(123_456);
        assert_eq!(sample.last_input_at(), from_boot);
    }

    #[test]
    fn test_last_input_never_after_observation() {
        let sample = IdleSample {
            last_input_tick: 70_500,
            now_tick: 70_000,
            observed_at: at(1_700_000_000),
        };
        assert_eq!(sample.idle(), Duration::ZERO);
        assert!(sample.last_input_at() <= sample.observed_at);
    }

    #[cfg(windows)]
    mod os {
        use super::super::*;
        use std::thread;

        #[test]
        fn test_last_input_tick_succeeds() {
            assert!(last_input_tick_count().is_ok());
        }

        #[test]
        fn test_idle_non_decreasing_without_input() {
            let first = sample().unwrap();
            let second = sample().unwrap();
            if first.last_input_tick == second.last_input_tick {
                assert!(second.idle() >= first.idle());
            }
        }

        #[test]
        fn test_idle_near_zero_after_input() {
            use std::mem::size_of;
            use std::time::Duration;
            use windows::Win32::UI::Input::KeyboardAndMouse::{
                SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_MOVE, MOUSEINPUT,
            };

            let before = last_input_tick_count().unwrap();

            // Zero-delta relative move: registers as input without moving the cursor.
            let input = INPUT {
                r#type: INPUT_MOUSE,
                Anonymous: INPUT_0 {
                    mi: MOUSEINPUT {
                        dwFlags: MOUSEEVENTF_MOVE,
                        ..Default::default()
                    },
                },
            };
            let sent = unsafe { SendInput(&[input], size_of::<INPUT>() as i32) };
            if sent != 1 {
                // No interactive desktop to inject into.
                return;
            }

            // The input thread records the event asynchronously.
            let mut latest = sample().unwrap();
            for _ in 0..20 {
                if latest.last_input_tick != before {
                    break;
                }
                thread::sleep(Duration::from_millis(5));
                latest = sample().unwrap();
            }
            if latest.last_input_tick == before {
                return;
            }

            assert!(latest.idle() < Duration::from_millis(100));
            assert!(idle_duration().unwrap() < Duration::from_millis(100));
        }

        #[test]
        fn test_last_input_not_in_future() {
            let last = last_input_timestamp().unwrap();
            assert!(last <= Utc::now());
        }

        #[test]
        fn test_boot_time_in_past() {
            assert!(boot_time() < Utc::now());
        }

        #[test]
        fn test_concurrent_samples() {
            let handles: Vec<_> = (0..4)
                .map(|_| thread::spawn(|| (0..100).map(|_| idle_duration().unwrap()).count()))
                .collect();

            for handle in handles {
                assert_eq!(handle.join().unwrap(), 100);
            }
        }
    }
}
