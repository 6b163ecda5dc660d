//! Shared data types that flow between discovery, the runner and the scheduler.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// One unit of work: a repository directory. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkItem(Arc<Path>);

impl WorkItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        WorkItem(Arc::from(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for WorkItem {
    fn from(path: PathBuf) -> Self {
        WorkItem::new(path)
    }
}

impl From<&str> for WorkItem {
    fn from(path: &str) -> Self {
        WorkItem::new(path)
    }
}

/// Why a unit of work did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The maintenance program could not be started at all.
    Spawn(String),
    /// The program ran and exited with a non-zero status.
    Exit(i32),
    /// The program was terminated without an exit status (e.g. by a signal).
    Terminated,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Spawn(reason) => write!(f, "failed to start: {reason}"),
            FailureKind::Exit(code) => write!(f, "exited with status {code}"),
            FailureKind::Terminated => write!(f, "terminated by signal"),
        }
    }
}

/// Result of running one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(FailureKind),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Emitted exactly once per dispatched item.
#[derive(Debug, Clone)]
pub struct CompletionEvent {
    pub item: WorkItem,
    pub outcome: Outcome,
    pub elapsed: Duration,
}
