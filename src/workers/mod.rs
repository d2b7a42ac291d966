//! # Worker abstractions.
//!
//! - [`Worker`] - trait for the unit of work a sleeper task runs
//! - [`WorkerFn`] - closure-backed worker implementation
//! - [`WorkerRef`] - shared reference to a worker (`Arc<dyn Worker>`)

mod worker;
mod worker_fn;

pub use worker::Worker;
pub use worker_fn::{WorkerFn, WorkerRef};
