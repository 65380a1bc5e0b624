//! Cooperative run control.
//!
//! Solvers poll a `RunControl` at every loop head. There is no
//! preemption inside a reachability search, so cancellation latency is
//! at worst one search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::error::SolveError;

/// Shared cancellation flag; clone it into whatever thread should be
/// able to stop a run.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-run cancellation signal and optional deadline. The default value
/// never fires.
#[derive(Clone, Debug, Default)]
pub struct RunControl {
    cancel: Option<CancelFlag>,
    deadline: Option<Instant>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelled_by(mut self, flag: &CancelFlag) -> Self {
        self.cancel = Some(flag.clone());
        self
    }

    pub fn with_deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(at);
        self
    }

    /// Err(`Aborted`) once the flag is raised or the deadline passed.
    pub fn check(&self) -> Result<(), SolveError> {
        if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            return Err(SolveError::Aborted);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SolveError::Aborted);
        }
        Ok(())
    }
}
