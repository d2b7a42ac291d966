//! # Background wait/work loop of one sleeper cycle.
//!
//! Runs until the cycle's stop token is cancelled, calling the worker once per
//! consumed wake-up and publishing lifecycle events.
//!
//! ## Loop
//! ```text
//! Started
//! permit pending ─► run                (before anything else)
//! while stop not requested {
//!   ├─► select (biased):
//!   │     ├─ stop.cancelled()  ─► idle waiter already woken? run; break
//!   │     └─ wake.notified()   ─► consume the single pending permit
//!   ├─► WorkStarting{run}
//!   ├─► worker.work()           (never interrupted; panics caught)
//!   └─► WorkFinished{run, elapsed} | WorkPanicked{run, reason}
//! }
//! StopRequested
//! StopMode::Drain and a permit pending ─► one last run
//! Stopped{runs}
//! flush subscribers (bounded by flush_grace)
//! drop(done_guard)              ─► every stop() waiter is released
//! ```
//!
//! ## Rules
//! - Work runs **sequentially**: a wake-up during work stores one permit and the
//!   next iteration consumes it, so N wake-ups during a run cause exactly one re-run.
//! - The stop token is only observed **between** runs.
//! - A wake-up recorded before the loop first runs, or delivered to the idle loop
//!   before it observes the stop request, is served in this cycle. Only a wake-up
//!   recorded during the last run is subject to [`StopMode`].
//! - The `done` token is cancelled by a drop guard owned by the loop future, so it
//!   is released on normal exit, on panic, and when the runtime drops the future.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::{pin, select, sync::Notify, time};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    core::config::StopMode,
    events::{Bus, Event, EventKind},
    subscribers::{Subscribe, SubscriberSet},
    workers::{Worker, WorkerRef},
};

/// Everything one background cycle needs, moved into the spawned loop.
pub(crate) struct CycleParams {
    /// Worker invoked on every consumed wake-up.
    pub worker: WorkerRef,
    /// Single-slot wake-up mailbox, shared across cycles.
    pub wake: Arc<Notify>,
    /// Stop request for this cycle.
    pub stop: CancellationToken,
    /// Cancels the cycle's completion token when dropped.
    pub done: DropGuard,
    /// Event bus shared across cycles.
    pub bus: Bus,
    /// Subscribers fed for the duration of this cycle.
    pub subscribers: Vec<Arc<dyn Subscribe>>,
    pub stop_mode: StopMode,
    pub flush_timeout: Option<Duration>,
    /// 1-based cycle number.
    pub cycle: u64,
}

/// Publishes events of one cycle to both the bus and the subscriber set.
struct Reporter {
    bus: Bus,
    set: SubscriberSet,
    task: Arc<str>,
    cycle: u64,
}

impl Reporter {
    fn event(&self, kind: EventKind) -> Event {
        Event::new(kind)
            .with_task(Arc::clone(&self.task))
            .with_cycle(self.cycle)
    }

    fn emit(&self, ev: Event) {
        self.set.emit(&ev);
        self.bus.publish(ev);
    }

    /// Closes subscriber queues and waits up to `grace` for them to drain.
    async fn finish(self, grace: Option<Duration>) {
        if let Some(grace) = grace {
            let _ = time::timeout(grace, self.set.shutdown()).await;
        }
    }
}

/// Runs one background cycle to completion.
pub(crate) async fn run_loop(params: CycleParams) {
    let CycleParams {
        worker,
        wake,
        stop,
        done,
        bus,
        subscribers,
        stop_mode,
        flush_timeout,
        cycle,
    } = params;

    let reporter = Reporter {
        set: SubscriberSet::new(&subscribers, bus.clone()),
        bus,
        task: Arc::from(worker.name()),
        cycle,
    };
    reporter.emit(reporter.event(EventKind::Started));

    let mut runs: u64 = 0;
    if wake.notified().now_or_never().is_some() {
        runs += 1;
        run_once(worker.as_ref(), runs, &reporter).await;
    }

    while !stop.is_cancelled() {
        let notified = wake.notified();
        pin!(notified);

        let stopped = select! {
            biased;
            _ = stop.cancelled() => true,
            _ = notified.as_mut() => false,
        };
        if stopped {
            // Woken while idle, then asked to stop before getting polled.
            if notified.now_or_never().is_some() {
                runs += 1;
                run_once(worker.as_ref(), runs, &reporter).await;
            }
            break;
        }
        runs += 1;
        run_once(worker.as_ref(), runs, &reporter).await;
    }
    reporter.emit(reporter.event(EventKind::StopRequested));

    if stop_mode == StopMode::Drain && wake.notified().now_or_never().is_some() {
        runs += 1;
        run_once(worker.as_ref(), runs, &reporter).await;
    }

    reporter.emit(reporter.event(EventKind::Stopped).with_runs(runs));
    reporter.finish(flush_timeout).await;
    drop(done);
}

/// Calls the worker once, reporting how the call ended.
async fn run_once(worker: &dyn Worker, run: u64, reporter: &Reporter) {
    reporter.emit(reporter.event(EventKind::WorkStarting).with_run(run));
    let started = Instant::now();

    match AssertUnwindSafe(worker.work()).catch_unwind().await {
        Ok(()) => reporter.emit(
            reporter
                .event(EventKind::WorkFinished)
                .with_run(run)
                .with_elapsed(started.elapsed()),
        ),
        Err(payload) => reporter.emit(
            reporter
                .event(EventKind::WorkPanicked)
                .with_run(run)
                .with_reason(panic_message(payload.as_ref())),
        ),
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(42_u8);

        assert_eq!(panic_message(s.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    #[tokio::test]
    async fn test_loop_releases_done_when_stopped_before_any_wake() {
        let done = CancellationToken::new();
        let stop = CancellationToken::new();
        let worker: WorkerRef = crate::workers::WorkerFn::arc("noop", || async {});

        stop.cancel();
        run_loop(CycleParams {
            worker,
            wake: Arc::new(Notify::new()),
            stop,
            done: done.clone().drop_guard(),
            bus: Bus::new(4),
            subscribers: Vec::new(),
            stop_mode: StopMode::Finish,
            flush_timeout: None,
            cycle: 1,
        })
        .await;

        assert!(done.is_cancelled());
    }

    #[tokio::test]
    async fn test_loop_serves_permit_recorded_before_stop() {
        let done = CancellationToken::new();
        let stop = CancellationToken::new();
        let wake = Arc::new(Notify::new());
        let bus = Bus::new(16);
        let mut events = bus.subscribe();
        let worker: WorkerRef = crate::workers::WorkerFn::arc("noop", || async {});

        wake.notify_one();
        stop.cancel();
        run_loop(CycleParams {
            worker,
            wake: Arc::clone(&wake),
            stop,
            done: done.clone().drop_guard(),
            bus,
            subscribers: Vec::new(),
            stop_mode: StopMode::Finish,
            flush_timeout: None,
            cycle: 1,
        })
        .await;

        let mut kinds = Vec::new();
        let mut total = None;
        while let Ok(ev) = events.try_recv() {
            if ev.kind == EventKind::Stopped {
                total = ev.runs;
                assert_eq!(ev.run, None);
            }
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::Started,
                EventKind::WorkStarting,
                EventKind::WorkFinished,
                EventKind::StopRequested,
                EventKind::Stopped,
            ]
        );
        assert_eq!(total, Some(1));
        assert!(wake.notified().now_or_never().is_none());
    }
}
