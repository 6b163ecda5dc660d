//! Progress reporting
//!
//! [`ProgressReporter`] turns completion events into a monotonically
//! advancing fraction and forwards them to a [`ProgressSink`], which does
//! the actual rendering. The terminal sink lives in [`terminal`].

use std::mem;

use crate::scheduler::RunSummary;
use crate::work::{CompletionEvent, WorkItem};

pub mod terminal;

pub use terminal::TerminalProgress;

/// Receives progress notifications. Every method has a no-op default.
pub trait ProgressSink: Send {
    fn started(&mut self, _total: usize) {}

    /// Called once per completion, in the order completions were received.
    fn item_completed(&mut self, _event: &CompletionEvent) {}

    fn advanced(&mut self, _completed: usize, _total: usize, _fraction: f64) {}

    fn finished(&mut self, _summary: &RunSummary) {}
}

/// Point-in-time view for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
    pub fraction: f64,
    /// Items completed since the previous snapshot, in completion order
    pub newly_completed: Vec<WorkItem>,
}

pub struct ProgressReporter<S> {
    total: usize,
    completed: usize,
    finished: bool,
    pending: Vec<WorkItem>,
    sink: S,
}

impl<S: ProgressSink> ProgressReporter<S> {
    pub fn new(total: usize, mut sink: S) -> Self {
        sink.started(total);
        let finished = total == 0;
        if finished {
            sink.advanced(0, 0, 1.0);
        }
        Self {
            total,
            completed: 0,
            finished,
            pending: Vec::new(),
            sink,
        }
    }

    /// Advance to `completed` and return the fraction done, in `[0, 1]`.
    ///
    /// Progress never moves backwards. Once `completed` reaches the total the
    /// reporter is finished and ignores further updates.
    pub fn update(&mut self, completed: usize) -> f64 {
        if self.finished {
            return 1.0;
        }

        self.completed = self.completed.max(completed.min(self.total));
        let fraction = self.fraction();
        self.sink.advanced(self.completed, self.total, fraction);

        if self.completed == self.total {
            self.finished = true;
        }
        fraction
    }

    /// Report one completed item. Call once per completion event, before
    /// the matching [`update`](Self::update).
    pub fn mark_complete(&mut self, event: &CompletionEvent) {
        if self.finished {
            tracing::debug!("ignoring completion of {} after finish", event.item);
            return;
        }
        self.pending.push(event.item.clone());
        self.sink.item_completed(event);
    }

    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current progress plus the items completed since the last snapshot.
    pub fn snapshot(&mut self) -> ProgressSnapshot {
        ProgressSnapshot {
            completed: self.completed,
            total: self.total,
            fraction: self.fraction(),
            newly_completed: mem::take(&mut self.pending),
        }
    }

    /// Render the final state and hand the sink back.
    pub fn finish(mut self, summary: &RunSummary) -> S {
        self.sink.finished(summary);
        self.sink
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
