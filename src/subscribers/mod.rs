//! # Event subscribers for the sleeper runtime.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling runtime events emitted by a [`SleeperTask`](crate::SleeperTask).
//!
//! ## Architecture
//! ```text
//! Event flow (per background cycle):
//!   run_loop ── emit(Event) ──┬──► Bus ──► SleeperTask::subscribe() receivers
//!                             │
//!                             └──► SubscriberSet ──► Subscribe::on_event(&Event)
//!                                                      │
//!                                                 ┌────┴────┬─────────┐
//!                                                 ▼         ▼         ▼
//!                                             LogWriter  Metrics   Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
