//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [started] task="flush" cycle=1
//! [work-starting] task="flush" cycle=1 run=1
//! [work-finished] task="flush" cycle=1 run=1 elapsed_ms=12
//! [work-panicked] task="flush" cycle=1 run=2 reason="boom"
//! [stop-requested] task="flush" cycle=1
//! [stopped] task="flush" cycle=1 runs=2
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render(e: &Event) -> String {
        let task = e.task.as_deref().unwrap_or("unknown");
        let cycle = e.cycle.unwrap_or_default();
        let run = e.run.unwrap_or_default();

        match e.kind {
            EventKind::Started => format!("[started] task={task:?} cycle={cycle}"),
            EventKind::WorkStarting => {
                format!("[work-starting] task={task:?} cycle={cycle} run={run}")
            }
            EventKind::WorkFinished => format!(
                "[work-finished] task={task:?} cycle={cycle} run={run} elapsed_ms={}",
                e.elapsed_ms.unwrap_or_default()
            ),
            EventKind::WorkPanicked => format!(
                "[work-panicked] task={task:?} cycle={cycle} run={run} reason={:?}",
                e.reason.as_deref().unwrap_or("unknown")
            ),
            EventKind::StopRequested => format!("[stop-requested] task={task:?} cycle={cycle}"),
            EventKind::Stopped => format!(
                "[stopped] task={task:?} cycle={cycle} runs={}",
                e.runs.unwrap_or_default()
            ),
            EventKind::SubscriberOverflow => format!(
                "[subscriber-overflow] subscriber={task:?} reason={:?}",
                e.reason.as_deref().unwrap_or("unknown")
            ),
            EventKind::SubscriberPanicked => format!(
                "[subscriber-panicked] subscriber={task} info={}",
                e.reason.as_deref().unwrap_or("unknown")
            ),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_render_work_finished() {
        let ev = Event::new(EventKind::WorkFinished)
            .with_task("flush")
            .with_cycle(1)
            .with_run(3)
            .with_elapsed(Duration::from_millis(12));

        assert_eq!(
            LogWriter::render(&ev),
            "[work-finished] task=\"flush\" cycle=1 run=3 elapsed_ms=12"
        );
    }

    #[test]
    fn test_render_stopped_reports_total_runs() {
        let ev = Event::new(EventKind::Stopped)
            .with_task("flush")
            .with_cycle(2)
            .with_runs(0);

        assert_eq!(LogWriter::render(&ev), "[stopped] task=\"flush\" cycle=2 runs=0");
    }
}
