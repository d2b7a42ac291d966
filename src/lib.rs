//! # sleeper
//!
//! **Sleeper** is a deferred, coalescing work dispatcher for tokio services.
//!
//! A [`SleeperTask`] runs a [`Worker`] on its own background loop. Any part of
//! the system may call [`SleeperTask::wake_up`] when there is something to do:
//! the call never waits, and a burst of wake-ups collapses into a single extra
//! run. [`SleeperTask::stop`] is synchronous from the caller's point of view: it
//! returns only after the loop has exited, including any `work()` in flight.
//!
//! ## Architecture
//! ```text
//!  wake_up() ──► Notify (one permit) ─┐
//!  wake_up() ──►        ▲             │
//!  wake_up() ──► (full: coalesced)    ▼
//!                         ┌──────────────────────────┐
//!  start() ── spawn ────► │ run_loop (one per cycle) │ ── work() ──► Worker
//!                         │  select(biased):         │
//!  stop() ── cancel ────► │   stop │ wake            │
//!         ◄── done ────── │  drop guard on exit      │
//!                         └────────────┬─────────────┘
//!                                      │ Event
//!                         ┌────────────┴────────────┐
//!                         ▼                         ▼
//!                 Bus (broadcast)            SubscriberSet
//!              SleeperTask::subscribe()   (per-subscriber queues)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                       |
//! |-------------------|--------------------------------------------------------------|------------------------------------------|
//! | **Dispatch**      | Coalescing wake-ups, synchronous stop, restartable cycles.   | [`SleeperTask`], [`SleeperBuilder`]      |
//! | **Workers**       | Define the unit of work as a trait impl or a closure.        | [`Worker`], [`WorkerFn`], [`WorkerRef`]  |
//! | **Configuration** | Stop mode, event bus size, subscriber flush grace.           | [`SleeperConfig`], [`StopMode`]          |
//! | **Observability** | Lifecycle events over a broadcast bus and subscriber set.    | [`Event`], [`EventKind`], [`Subscribe`]  |
//! | **Errors**        | Typed errors for rejected starts.                            | [`SleeperError`]                         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` subscriber _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use sleeper::{SleeperConfig, SleeperTask, StopMode, Worker};
//!
//! struct Flusher;
//!
//! #[async_trait]
//! impl Worker for Flusher {
//!     fn name(&self) -> &str { "flusher" }
//!
//!     async fn work(&self) {
//!         // write buffered records...
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), sleeper::SleeperError> {
//!     let task = SleeperTask::builder(Arc::new(Flusher))
//!         .with_config(SleeperConfig { stop_mode: StopMode::Drain, ..Default::default() })
//!         .build();
//!
//!     task.start()?;
//!     task.wake_up();
//!     task.wake_up();
//!     task.stop().await;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use self::core::{SleeperBuilder, SleeperConfig, SleeperTask, StopMode};
pub use error::SleeperError;
pub use events::{Event, EventKind};
pub use subscribers::Subscribe;
pub use workers::{Worker, WorkerFn, WorkerRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
