//! Runtime core: the sleeper task and its background loop.
//!
//! The public API from this module is [`SleeperTask`] with its [`SleeperBuilder`]
//! and configuration ([`SleeperConfig`], [`StopMode`]).
//!
//! Internal modules:
//! - [`sleeper`]: lifecycle (`start`/`wake_up`/`stop`) and per-cycle signal pairs;
//! - [`runner`]: the wait/work loop of one cycle, with event publishing;
//! - [`builder`]: optional configuration and subscribers;
//! - [`config`]: per-task settings.

mod builder;
mod config;
mod runner;
mod sleeper;

pub use builder::SleeperBuilder;
pub use config::{SleeperConfig, StopMode};
pub(crate) use runner::panic_message;
pub use sleeper::SleeperTask;
