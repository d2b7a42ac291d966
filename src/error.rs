//! Error types used by the sleeper runtime.
//!
//! Only [`SleeperTask::start`](crate::SleeperTask::start) can fail: waking and
//! stopping are infallible by contract. [`SleeperError`] provides helper methods
//! (`as_label`, `as_message`) for logs and metrics.

use thiserror::Error;

/// # Errors produced when starting a sleeper task.
///
/// These never describe worker failures: a worker has no error channel back to
/// the task. They only report a `start()` that could not establish a new
/// background loop. The task state is left untouched in every case.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SleeperError {
    /// A background loop is already running for this task.
    #[error("sleeper task {name:?} is already running")]
    AlreadyRunning {
        /// Worker name of the task.
        name: String,
    },

    /// A stop was requested but the background loop has not exited yet.
    #[error("sleeper task {name:?} is still stopping")]
    Stopping {
        /// Worker name of the task.
        name: String,
    },

    /// `start()` was called outside of a tokio runtime.
    #[error("no tokio runtime available to spawn the background loop")]
    NoRuntime,
}

impl SleeperError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use sleeper::SleeperError;
    ///
    /// let err = SleeperError::AlreadyRunning { name: "flush".into() };
    /// assert_eq!(err.as_label(), "sleeper_already_running");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SleeperError::AlreadyRunning { .. } => "sleeper_already_running",
            SleeperError::Stopping { .. } => "sleeper_stopping",
            SleeperError::NoRuntime => "sleeper_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SleeperError::AlreadyRunning { name } => format!("already running: {name}"),
            SleeperError::Stopping { name } => format!("stop in progress: {name}"),
            SleeperError::NoRuntime => "no tokio runtime".to_string(),
        }
    }
}
