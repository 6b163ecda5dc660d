//! Bounded-concurrency execution engine
//!
//! The [`Scheduler`] owns a fixed number of slots. It starts one worker
//! thread per dispatched repository, and a single control loop consumes
//! their completion events from a crossbeam channel, updating
//! [`SchedulerState`] and the progress reporter and refilling each freed
//! slot with the next repository in enumeration order.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ dispatch ┌──────────────┐  CompletionEvent  ┌──────────────┐
//! │ control loop │─────────▶│ worker (1/N) │──────────────────▶│ event channel│
//! │  (1 writer)  │◀─────────┴──────────────┘                   └──────────────┘
//! └──────────────┘◀──── cancel channel (Ctrl+C / SIGTERM)
//! ```
//!
//! Only the control loop mutates scheduler state. The concurrency bound is
//! enforced by dispatch gating alone: a worker is started only in place of
//! one that has completed.
//!
//! # Cancellation
//!
//! A message on the cancel channel stops dispatch at once; one already
//! queued when [`Scheduler::run`] begins means nothing is started. With
//! [`CancelPolicy::Abandon`] the loop returns immediately and in-flight
//! workers are left to finish on their own. With [`CancelPolicy::Drain`]
//! the loop keeps collecting completions until nothing is in flight; a
//! second cancel message abandons the drain.

use crossbeam::channel::{self, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

pub mod budget;
pub mod state;
mod summary;

pub use state::{Phase, SchedulerState, Transition};
pub use summary::RunSummary;

use crate::progress::{ProgressReporter, ProgressSink};
use crate::runner::Runner;
use crate::work::{CompletionEvent, FailureKind, Outcome, WorkItem};

/// What to do with in-flight work when the operator aborts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CancelPolicy {
    /// Exit the control loop immediately; running processes are not waited for.
    #[default]
    Abandon,
    /// Stop dispatching and wait for running processes to finish.
    Drain,
}

enum LoopSignal {
    Completion(Option<CompletionEvent>),
    Cancel(bool),
}

pub struct Scheduler<R> {
    items: Vec<WorkItem>,
    runner: Arc<R>,
    concurrency: NonZeroUsize,
    policy: CancelPolicy,
}

impl<R: Runner> Scheduler<R> {
    pub fn new(items: Vec<WorkItem>, runner: R, concurrency: NonZeroUsize) -> Self {
        Self {
            items,
            runner: Arc::new(runner),
            concurrency,
            policy: CancelPolicy::default(),
        }
    }

    pub fn with_cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every item to completion, or until cancelled.
    ///
    /// Per-item failures never abort the run; they are recorded in the
    /// returned summary. Pass [`channel::never`] as `cancel` when the run
    /// cannot be aborted.
    pub fn run<S: ProgressSink>(
        &self,
        reporter: &mut ProgressReporter<S>,
        cancel: &Receiver<()>,
    ) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new(self.items.len());
        let mut state = SchedulerState::new(self.items.len(), self.concurrency);
        let (event_tx, event_rx) = channel::unbounded::<CompletionEvent>();
        let mut cancel = cancel.clone();

        tracing::info!(
            "sweeping {} repositories with up to {} at a time",
            state.total(),
            state.concurrency_limit()
        );

        // An abort that arrived before the run started dispatches nothing
        if cancel.try_recv().is_ok() {
            tracing::info!("cancellation requested before dispatch: nothing started");
            summary.cancelled = true;
            summary.elapsed = started.elapsed();
            return summary;
        }

        for index in state.start() {
            self.dispatch(index, &event_tx);
        }

        while !self.should_exit(&state) {
            let signal = channel::select! {
                recv(event_rx) -> event => LoopSignal::Completion(event.ok()),
                recv(cancel) -> msg => LoopSignal::Cancel(msg.is_ok()),
            };

            match signal {
                LoopSignal::Completion(Some(event)) => {
                    let transition = state.complete(&event.outcome);
                    self.record(&event, &mut summary, reporter);
                    reporter.update(state.completed());

                    if let Some(next) = transition.dispatch {
                        self.dispatch(next, &event_tx);
                    }
                }
                // The loop holds a sender, so this cannot happen
                LoopSignal::Completion(None) => break,
                // Sender dropped: nobody can cancel any more
                LoopSignal::Cancel(false) => cancel = channel::never(),
                LoopSignal::Cancel(true) => {
                    if state.cancel() {
                        summary.cancelled = true;
                        tracing::info!(
                            "cancellation requested: {} in flight, {} not started",
                            state.in_flight(),
                            state.total() - state.next_index()
                        );
                    } else if state.phase() == Phase::Cancelled {
                        tracing::info!("second cancellation: abandoning the drain");
                        break;
                    }
                }
            }
        }

        summary.abandoned = state.in_flight();
        summary.elapsed = started.elapsed();
        tracing::info!(
            "sweep finished: {} succeeded, {} failed, {} abandoned in {:.1?}",
            summary.succeeded,
            summary.failed(),
            summary.abandoned,
            summary.elapsed
        );
        summary
    }

    fn should_exit(&self, state: &SchedulerState) -> bool {
        match state.phase() {
            Phase::Done => true,
            Phase::Cancelled => self.policy == CancelPolicy::Abandon || state.in_flight() == 0,
            _ => false,
        }
    }

    fn record<S: ProgressSink>(
        &self,
        event: &CompletionEvent,
        summary: &mut RunSummary,
        reporter: &mut ProgressReporter<S>,
    ) {
        match &event.outcome {
            Outcome::Success => {
                tracing::debug!("{} finished in {:.1?}", event.item, event.elapsed);
                summary.succeeded += 1;
            }
            Outcome::Failure(kind) => {
                tracing::warn!("{} failed: {}", event.item, kind);
                summary.failures.push((event.item.clone(), kind.clone()));
            }
        }
        reporter.mark_complete(event);
    }

    fn dispatch(&self, index: usize, events: &Sender<CompletionEvent>) {
        let item = self.items[index].clone();
        tracing::debug!("dispatching {} ({}/{})", item, index + 1, self.items.len());

        let worker_item = item.clone();
        let worker_events = events.clone();
        let runner = Arc::clone(&self.runner);

        let spawned = thread::Builder::new()
            .name(format!("reposweep-worker-{index}"))
            .spawn(move || {
                let started = Instant::now();
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| runner.run(&worker_item)))
                    .unwrap_or_else(|_| Outcome::Failure(FailureKind::Spawn("runner panicked".into())));
                // The receiver is gone if the loop abandoned us
                let _ = worker_events.send(CompletionEvent {
                    item: worker_item,
                    outcome,
                    elapsed: started.elapsed(),
                });
            });

        if let Err(err) = spawned {
            // Counts as a dispatch failure so the slot is still released
            let _ = events.send(CompletionEvent {
                item,
                outcome: Outcome::Failure(FailureKind::Spawn(format!(
                    "could not start worker thread: {err}"
                ))),
                elapsed: Default::default(),
            });
        }
    }
}
