//! Unit-of-work execution
//!
//! A [`Runner`] performs the maintenance operation on one repository and
//! blocks until it finishes. The scheduler calls it from a dedicated worker
//! thread, so a slow repository only holds up its own slot.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::work::{FailureKind, Outcome, WorkItem};

/// Runs the maintenance operation on a single work item.
pub trait Runner: Send + Sync + 'static {
    fn run(&self, item: &WorkItem) -> Outcome;
}

impl<F> Runner for F
where
    F: Fn(&WorkItem) -> Outcome + Send + Sync + 'static,
{
    fn run(&self, item: &WorkItem) -> Outcome {
        self(item)
    }
}

/// Runs an external program with the repository as its working directory.
///
/// Standard input, output and error are all discarded. The outcome is
/// success only for exit status zero; a program that cannot be started is
/// reported as [`FailureKind::Spawn`] and never retried.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `git gc`
    pub fn git_gc() -> Self {
        Self::new("git", vec!["gc".to_string()])
    }

    /// Resolve the program on `PATH`, if it can be found there.
    pub fn locate(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }

    /// Human-readable command line, for logs and summaries.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Runner for CommandRunner {
    fn run(&self, item: &WorkItem) -> Outcome {
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(item.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Outcome::Success,
            Ok(status) => match status.code() {
                Some(code) => Outcome::Failure(FailureKind::Exit(code)),
                None => Outcome::Failure(FailureKind::Terminated),
            },
            Err(err) => {
                tracing::debug!("could not start '{}' in {}: {}", self.program, item, err);
                Outcome::Failure(FailureKind::Spawn(err.to_string()))
            }
        }
    }
}
