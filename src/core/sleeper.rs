//! # SleeperTask: deferred, coalescing work dispatcher.
//!
//! A [`SleeperTask`] owns one [`Worker`](crate::Worker) and at most one
//! background loop that calls it. Other parts of the system call
//! [`wake_up`](SleeperTask::wake_up) whenever there is something to do; the
//! loop runs the worker once per *batch* of wake-ups.
//!
//! ## State machine
//! ```text
//!            start()                      wake_up()
//! Stopped ───────────► Idle ◄──────────────────────► Working
//!    ▲                  │     work() returns,             │  wake_up()
//!    │                  │     nothing pending             ▼
//!    │                  │                     WorkingWithPendingRerun
//!    │                  │                                 │  work() returns:
//!    │   stop()         │                                 │  permit consumed,
//!    └──────────────────┘                                 └─► Working again
//!        (from Working: only after the current work() returns)
//! ```
//!
//! ## Signals
//! - **Wake-up**: a `tokio::sync::Notify` holding at most one permit. It lives as
//!   long as the task, so a wake-up issued before `start()` (or between cycles)
//!   is served by the next loop.
//! - **Stop request**: a fresh `CancellationToken` per cycle.
//! - **Completion barrier**: a second fresh `CancellationToken` per cycle, cancelled
//!   by the loop itself when it has fully exited. `stop()` waits on it.
//!
//! ## Rules
//! - `wake_up()` is synchronous and never waits, from any thread, in any state.
//! - `stop()` never returns while `work()` is running; concurrent callers all wait.
//! - `stop()` on a stopped or never-started task returns immediately.
//! - A wake-up recorded before `start()`, or while the loop is idle, runs even
//!   when `stop()` follows right away.
//! - `start()` on a running task is rejected with [`SleeperError::AlreadyRunning`].

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    sync::{Notify, broadcast},
};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        builder::SleeperBuilder,
        config::SleeperConfig,
        runner::{CycleParams, run_loop},
    },
    error::SleeperError,
    events::{Bus, Event},
    subscribers::Subscribe,
    workers::WorkerRef,
};

/// Signal pair of one background cycle.
struct Cycle {
    stop: CancellationToken,
    done: CancellationToken,
}

impl Cycle {
    fn is_finished(&self) -> bool {
        self.done.is_cancelled()
    }
}

struct State {
    /// Number of cycles started so far.
    cycles: u64,
    current: Option<Cycle>,
}

/// Runs a worker on a background loop, once per batch of wake-ups.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use sleeper::{SleeperTask, WorkerFn};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), sleeper::SleeperError> {
///     let runs = Arc::new(AtomicUsize::new(0));
///     let r = Arc::clone(&runs);
///     let task = SleeperTask::new(WorkerFn::arc("flush", move || {
///         let r = Arc::clone(&r);
///         async move {
///             r.fetch_add(1, Ordering::SeqCst);
///         }
///     }));
///
///     task.wake_up();
///     task.wake_up(); // coalesced with the first one
///     task.start()?;
///
///     tokio::time::sleep(std::time::Duration::from_millis(50)).await;
///     task.stop().await;
///
///     assert_eq!(runs.load(Ordering::SeqCst), 1);
///     Ok(())
/// }
/// ```
pub struct SleeperTask {
    worker: WorkerRef,
    cfg: SleeperConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus: Bus,
    wake: Arc<Notify>,
    state: Mutex<State>,
}

impl SleeperTask {
    /// Creates a stopped task with default configuration and no subscribers.
    pub fn new(worker: WorkerRef) -> Self {
        Self::builder(worker).build()
    }

    /// Returns a builder for a task with custom configuration or subscribers.
    pub fn builder(worker: WorkerRef) -> SleeperBuilder {
        SleeperBuilder::new(worker)
    }

    pub(crate) fn from_parts(
        worker: WorkerRef,
        cfg: SleeperConfig,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            worker,
            cfg,
            subscribers,
            bus,
            wake: Arc::new(Notify::new()),
            state: Mutex::new(State {
                cycles: 0,
                current: None,
            }),
        }
    }

    /// Spawns the background loop on the current tokio runtime and returns immediately.
    ///
    /// If a wake-up is pending, the loop runs the worker right away.
    ///
    /// ### Errors
    /// - [`SleeperError::AlreadyRunning`] if a loop is running and no stop was requested
    /// - [`SleeperError::Stopping`] if a stop was requested but the loop has not exited yet
    /// - [`SleeperError::NoRuntime`] outside of a tokio runtime
    pub fn start(&self) -> Result<(), SleeperError> {
        let handle = Handle::try_current().map_err(|_| SleeperError::NoRuntime)?;

        let mut state = self.state.lock();
        if let Some(cur) = state.current.as_ref().filter(|c| !c.is_finished()) {
            let name = self.name().to_string();
            return Err(if cur.stop.is_cancelled() {
                SleeperError::Stopping { name }
            } else {
                SleeperError::AlreadyRunning { name }
            });
        }

        state.cycles += 1;
        let cycle = Cycle {
            stop: CancellationToken::new(),
            done: CancellationToken::new(),
        };
        handle.spawn(run_loop(CycleParams {
            worker: Arc::clone(&self.worker),
            wake: Arc::clone(&self.wake),
            stop: cycle.stop.clone(),
            done: cycle.done.clone().drop_guard(),
            bus: self.bus.clone(),
            subscribers: self.subscribers.clone(),
            stop_mode: self.cfg.stop_mode,
            flush_timeout: self.cfg.flush_timeout(),
            cycle: state.cycles,
        }));
        state.current = Some(cycle);
        Ok(())
    }

    /// Records a pending wake-up. Never waits.
    ///
    /// Wake-ups coalesce: any number of calls before the loop picks the pending
    /// one up cause a single run. A wake-up issued while the task is stopped is
    /// kept for the next [`start`](Self::start).
    pub fn wake_up(&self) {
        self.wake.notify_one();
    }

    /// Like [`wake_up`](Self::wake_up), but discards the signal unless a loop is
    /// running and no stop has been requested.
    pub fn wake_up_if_started(&self) {
        let state = self.state.lock();
        if state
            .current
            .as_ref()
            .is_some_and(|c| !c.stop.is_cancelled())
        {
            self.wake.notify_one();
        }
    }

    /// Requests the background loop to stop and waits until it has exited.
    ///
    /// A `work()` call in progress is never interrupted; this waits for it.
    /// Returns immediately when the task is not running.
    pub async fn stop(&self) {
        let done = {
            let state = self.state.lock();
            match state.current.as_ref() {
                Some(cur) => {
                    cur.stop.cancel();
                    cur.done.clone()
                }
                None => return,
            }
        };

        done.cancelled().await;

        let mut state = self.state.lock();
        if state.current.as_ref().is_some_and(Cycle::is_finished) {
            state.current = None;
        }
    }

    /// True between a successful [`start`](Self::start) and the exit of that loop.
    pub fn is_running(&self) -> bool {
        self.state
            .lock()
            .current
            .as_ref()
            .is_some_and(|c| !c.is_finished())
    }

    /// Returns the worker's name.
    pub fn name(&self) -> &str {
        self.worker.name()
    }

    /// Returns the task configuration.
    pub fn config(&self) -> &SleeperConfig {
        &self.cfg
    }

    /// Creates a receiver for subsequent runtime events of this task.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}

impl Drop for SleeperTask {
    /// Requests stop of a running loop without waiting for it.
    fn drop(&mut self) {
        if let Some(cur) = self.state.get_mut().current.as_ref() {
            cur.stop.cancel();
        }
    }
}
