//! # Sleeper task configuration.
//!
//! Provides [`SleeperConfig`] settings for a single [`SleeperTask`](crate::SleeperTask)
//! and [`StopMode`], which decides what happens to a wake-up that arrives while
//! the last unit of work before a stop is running.
//!
//! ## Sentinel values
//! - `flush_grace = 0s` → do not wait for subscriber queues on loop exit
//! - `bus_capacity = 0` → clamped to 1 by the bus

use std::time::Duration;

/// What the background loop does with a pending re-run once a stop is requested.
///
/// Only a wake-up recorded while the last unit of work runs is affected. A wake-up
/// recorded before `start()`, or delivered to the idle loop before it saw the
/// stop request, always runs before the loop exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StopMode {
    /// Finish the current unit of work, then exit even if a wake-up arrived during it.
    #[default]
    Finish,
    /// Run the one pending re-run (if any) before exiting.
    Drain,
}

/// Configuration for a sleeper task.
///
/// ## Field semantics
/// - `stop_mode`: handling of a pending re-run at stop time
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `flush_grace`: maximum wait for subscriber queues when a cycle ends (`0s` = no wait)
#[derive(Clone, Debug)]
pub struct SleeperConfig {
    /// Pending re-run handling when a stop is requested.
    pub stop_mode: StopMode,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Maximum time the exiting loop waits for subscribers to drain their queues.
    ///
    /// `stop()` waits for this flush too, so it bounds how much a slow subscriber
    /// can delay shutdown. Subscribers still running afterwards continue detached.
    pub flush_grace: Duration,
}

impl SleeperConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the subscriber flush timeout as an `Option`.
    ///
    /// - `None` → do not wait for subscribers
    /// - `Some(d)` → wait up to `d`
    #[inline]
    pub fn flush_timeout(&self) -> Option<Duration> {
        if self.flush_grace == Duration::ZERO {
            None
        } else {
            Some(self.flush_grace)
        }
    }
}

impl Default for SleeperConfig {
    /// Default configuration:
    ///
    /// - `stop_mode = StopMode::Finish`
    /// - `bus_capacity = 64`
    /// - `flush_grace = 1s`
    fn default() -> Self {
        Self {
            stop_mode: StopMode::default(),
            bus_capacity: 64,
            flush_grace: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SleeperConfig::default();
        assert_eq!(cfg.stop_mode, StopMode::Finish);
        assert_eq!(cfg.bus_capacity_clamped(), 64);
        assert_eq!(cfg.flush_timeout(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_sentinels() {
        let cfg = SleeperConfig {
            bus_capacity: 0,
            flush_grace: Duration::ZERO,
            ..SleeperConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.flush_timeout(), None);
    }
}
