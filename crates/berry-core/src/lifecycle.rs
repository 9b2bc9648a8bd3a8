//! Controller state machine.
//!
//! ```text
//! NotStarted -> Constructing -> Constructed -> Running -> RanOk     -> CleaningUp -> Done
//!                                                      -> RanFailed -> CleaningUp
//!               Constructing -> ConstructFailed -> Exited
//! ```
use std::fmt;

use tracing::debug;

use crate::error::ControllerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Constructing,
    Constructed,
    ConstructFailed,
    Exited,
    Running,
    RanOk,
    RanFailed,
    CleaningUp,
    Done,
}

impl Phase {
    /// Whether `next` directly follows `self`.
    pub fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (NotStarted, Constructing)
                | (Constructing, Constructed)
                | (Constructing, ConstructFailed)
                | (ConstructFailed, Exited)
                | (Constructed, Running)
                | (Running, RanOk)
                | (Running, RanFailed)
                | (RanOk, CleaningUp)
                | (RanFailed, CleaningUp)
                | (CleaningUp, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Exited | Phase::Done)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::NotStarted => "not-started",
            Phase::Constructing => "constructing",
            Phase::Constructed => "constructed",
            Phase::ConstructFailed => "construct-failed",
            Phase::Exited => "exited",
            Phase::Running => "running",
            Phase::RanOk => "ran-ok",
            Phase::RanFailed => "ran-failed",
            Phase::CleaningUp => "cleaning-up",
            Phase::Done => "done",
        })
    }
}

/// Ordered record of the phases a controller went through.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    history: Vec<Phase>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            history: vec![Phase::NotStarted],
        }
    }

    pub fn current(&self) -> Phase {
        self.history.last().copied().unwrap_or(Phase::NotStarted)
    }

    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    /// Moves to `next`, rejecting anything the state machine does not allow.
    pub fn advance(&mut self, next: Phase) -> Result<(), ControllerError> {
        let from = self.current();
        if !from.can_advance_to(next) {
            return Err(ControllerError::Lifecycle { from, to: next });
        }
        self.push(from, next);
        Ok(())
    }

    /// Moves along a transition the caller already knows to be legal.
    pub(crate) fn enter(&mut self, next: Phase) {
        let from = self.current();
        debug_assert!(from.can_advance_to(next), "illegal transition {from} -> {next}");
        self.push(from, next);
    }

    fn push(&mut self, from: Phase, next: Phase) {
        debug!(%from, to = %next, "lifecycle transition");
        self.history.push(next);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
