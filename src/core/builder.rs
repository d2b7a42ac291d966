use std::sync::Arc;

use super::{config::SleeperConfig, sleeper::SleeperTask};
use crate::{subscribers::Subscribe, workers::WorkerRef};

/// Builder for constructing a [`SleeperTask`] with optional settings.
pub struct SleeperBuilder {
    worker: WorkerRef,
    cfg: SleeperConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SleeperBuilder {
    /// Creates a new builder for the given worker with default configuration.
    pub fn new(worker: WorkerRef) -> Self {
        Self {
            worker,
            cfg: SleeperConfig::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the task configuration.
    pub fn with_config(mut self, cfg: SleeperConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (cycle and work lifecycle) through
    /// dedicated workers with bounded queues, spawned anew for every cycle.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds a stopped task.
    ///
    /// Nothing is spawned here, so this does not need a tokio runtime.
    pub fn build(self) -> SleeperTask {
        SleeperTask::from_parts(self.worker, self.cfg, self.subscribers)
    }
}
