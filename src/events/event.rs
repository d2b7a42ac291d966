//! # Runtime events emitted by the sleeper background loop.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Cycle events**: a background loop starts, is asked to stop, exits
//! - **Work events**: one run of the worker (starting, finished, panicked)
//! - **Subscriber events**: delivery problems inside the subscriber set
//!
//! The [`Event`] struct carries additional metadata such as timestamps, worker name,
//! cycle and run counters.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use sleeper::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WorkFinished)
//!     .with_task("flush")
//!     .with_cycle(2)
//!     .with_run(7)
//!     .with_elapsed(Duration::from_millis(15));
//!
//! assert_eq!(ev.kind, EventKind::WorkFinished);
//! assert_eq!(ev.task.as_deref(), Some("flush"));
//! assert_eq!(ev.run, Some(7));
//! assert_eq!(ev.elapsed_ms, Some(15));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Cycle events ===
    /// A background loop has been spawned.
    ///
    /// Sets:
    /// - `task`: worker name
    /// - `cycle`: cycle number (1-based, per task instance)
    Started,

    /// The loop observed a stop request.
    ///
    /// Sets:
    /// - `task`: worker name
    /// - `cycle`: cycle number
    StopRequested,

    /// The loop has exited; no further work runs in this cycle.
    ///
    /// Sets:
    /// - `task`: worker name
    /// - `cycle`: cycle number
    /// - `runs`: total runs performed during the cycle
    Stopped,

    // === Work events ===
    /// The loop is about to call the worker.
    ///
    /// Sets:
    /// - `task`: worker name
    /// - `cycle`: cycle number
    /// - `run`: run number within the cycle (1-based)
    WorkStarting,

    /// The worker returned.
    ///
    /// Sets:
    /// - `task`: worker name
    /// - `cycle`, `run`
    /// - `elapsed_ms`: wall time spent inside the worker
    WorkFinished,

    /// The worker panicked; the loop keeps serving wake-ups.
    ///
    /// Sets:
    /// - `task`: worker name
    /// - `cycle`, `run`
    /// - `reason`: panic payload, if it was a string
    WorkPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Time spent in the worker, in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
    /// Human-readable reason (panic payloads, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Background cycle number (starting from 1).
    pub cycle: Option<u64>,
    /// Run number within the cycle (starting from 1).
    pub run: Option<u64>,
    /// Total runs performed by a finished cycle.
    pub runs: Option<u64>,
    /// Name of the worker (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            elapsed_ms: None,
            reason: None,
            cycle: None,
            run: None,
            runs: None,
            task: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a cycle number.
    #[inline]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Attaches a run number.
    #[inline]
    pub fn with_run(mut self, run: u64) -> Self {
        self.run = Some(run);
        self
    }

    /// Attaches the total run count of a finished cycle.
    #[inline]
    pub fn with_runs(mut self, runs: u64) -> Self {
        self.runs = Some(runs);
        self
    }

    /// Attaches the time spent in the worker (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.elapsed_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::Started);
        let b = Event::new(EventKind::Stopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_elapsed_saturates() {
        let ev = Event::new(EventKind::WorkFinished).with_elapsed(Duration::from_secs(u64::MAX));
        assert_eq!(ev.elapsed_ms, Some(u32::MAX));
    }

    #[test]
    fn test_subscriber_helpers() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_event());
        assert_eq!(ev.task.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));

        assert!(!Event::new(EventKind::WorkStarting).is_subscriber_event());
    }
}
