//! # Worker abstraction.
//!
//! This module defines the [`Worker`] trait: the single capability a
//! [`SleeperTask`](crate::SleeperTask) consumes from its collaborator.
//!
//! A worker has no inputs, no outputs and no error channel. Whatever goes wrong
//! inside [`Worker::work`] is the worker's own concern; the task only guarantees
//! when and how often it is called.

use async_trait::async_trait;

/// # One unit of deferred work.
///
/// A `Worker` has a stable [`name`](Worker::name) and an async [`work`](Worker::work)
/// method. The sleeper calls `work` from its background loop, never concurrently
/// with itself, and never interrupts a call in progress.
///
/// `work` may take arbitrarily long. Code that blocks the thread should move
/// itself onto `tokio::task::spawn_blocking`.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use sleeper::Worker;
///
/// struct Compactor;
///
/// #[async_trait]
/// impl Worker for Compactor {
///     fn name(&self) -> &str { "compactor" }
///
///     async fn work(&self) {
///         // merge segments...
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Returns a stable, human-readable worker name.
    fn name(&self) -> &str;

    /// Performs one unit of work.
    async fn work(&self);
}
