//! Scheduler bookkeeping, free of threads and I/O.
//!
//! ```text
//! Initializing ──start──▶ Running ──all dispatched──▶ Draining ──last completion──▶ Done
//!      │                     │                           │
//!      └── total == 0 ──▶ Done                           │
//!                            └────────cancel─────────────┴──▶ Cancelled
//! ```
//!
//! The engine owns exactly one [`SchedulerState`] and feeds it completion
//! outcomes one at a time, so no locking is needed.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::work::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Items are known, nothing dispatched yet.
    Initializing,
    /// Items remain to be dispatched.
    Running,
    /// Everything has been dispatched; waiting for the stragglers.
    Draining,
    /// Every item has completed.
    Done,
    /// Operator abort accepted. Nothing more will be dispatched.
    Cancelled,
}

/// What the engine must do after a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Index of the next item to start, if a slot was refilled.
    pub dispatch: Option<usize>,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct SchedulerState {
    total: usize,
    concurrency_limit: usize,
    next_index: usize,
    in_flight: usize,
    completed: usize,
    failed: usize,
    phase: Phase,
}

impl SchedulerState {
    pub fn new(total: usize, concurrency_limit: NonZeroUsize) -> Self {
        Self {
            total,
            concurrency_limit: concurrency_limit.get(),
            next_index: 0,
            in_flight: 0,
            completed: 0,
            failed: 0,
            phase: Phase::Initializing,
        }
    }

    /// Fill the initial slots. Returns the indices to dispatch, in order.
    ///
    /// Only meaningful once; later calls return an empty range.
    pub fn start(&mut self) -> Range<usize> {
        if self.phase != Phase::Initializing {
            return 0..0;
        }
        if self.total == 0 {
            self.phase = Phase::Done;
            return 0..0;
        }

        let initial = self.concurrency_limit.min(self.total);
        self.next_index = initial;
        self.in_flight = initial;
        self.phase = if self.next_index < self.total {
            Phase::Running
        } else {
            Phase::Draining
        };
        0..initial
    }

    /// Record one completion and refill its slot if work remains.
    ///
    /// A completion with nothing in flight is ignored.
    pub fn complete(&mut self, outcome: &Outcome) -> Transition {
        if self.in_flight == 0 {
            tracing::warn!("completion received with nothing in flight; ignoring");
            return Transition {
                dispatch: None,
                phase: self.phase,
            };
        }

        self.in_flight -= 1;
        self.completed += 1;
        if !outcome.is_success() {
            self.failed += 1;
        }

        let mut dispatch = None;
        match self.phase {
            Phase::Running | Phase::Draining => {
                if self.next_index < self.total {
                    dispatch = Some(self.next_index);
                    self.next_index += 1;
                    self.in_flight += 1;
                }

                if self.completed == self.total {
                    self.phase = Phase::Done;
                } else if self.next_index == self.total {
                    self.phase = Phase::Draining;
                }
            }
            // Absorbing: count the straggler, start nothing
            Phase::Cancelled => {}
            Phase::Initializing | Phase::Done => {}
        }

        Transition {
            dispatch,
            phase: self.phase,
        }
    }

    /// Accept an operator abort. Returns false when there is nothing to cancel.
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            Phase::Running | Phase::Draining => {
                self.phase = Phase::Cancelled;
                true
            }
            _ => false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once all work completed or an abort was accepted.
    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done | Phase::Cancelled)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}
