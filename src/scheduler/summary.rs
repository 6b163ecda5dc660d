use std::time::Duration;

use crate::work::{FailureKind, WorkItem};

/// Result of one sweep.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    /// Failed items in the order their completions arrived
    pub failures: Vec<(WorkItem, FailureKind)>,
    /// Items dispatched but not yet completed when the loop exited
    pub abandoned: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Completed items, successful or not.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.failures.is_empty() && self.completed() == self.total
    }
}
