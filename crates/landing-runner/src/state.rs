//! Run lifecycle state machine.

use std::fmt;

use crate::error::{RunnerError, RunnerResult};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing resolved yet.
    Idle,
    /// The execution plan has been resolved.
    PlanResolved,
    /// Group `k` (0-based, in ascending run order) is executing.
    GroupExecuting(usize),
    /// Every group settled without an untolerated failure.
    Complete,
    /// A module rejected and the run stopped.
    Failed,
}

impl RunState {
    /// Whether `self -> to` is a legal transition.
    #[must_use]
    pub fn can_transition(self, to: Self) -> bool {
        match (self, to) {
            (Self::Idle, Self::PlanResolved)
            | (Self::PlanResolved, Self::GroupExecuting(0) | Self::Complete)
            | (Self::GroupExecuting(_), Self::Complete | Self::Failed) => true,
            (Self::GroupExecuting(k), Self::GroupExecuting(next)) => next == k + 1,
            _ => false,
        }
    }

    /// Move to `to`, rejecting illegal transitions.
    pub fn transition(&mut self, to: Self) -> RunnerResult<()> {
        if !self.can_transition(to) {
            return Err(RunnerError::InvalidTransition {
                from: self.to_string(),
                to: to.to_string(),
            });
        }
        *self = to;
        Ok(())
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::PlanResolved => f.write_str("PlanResolved"),
            Self::GroupExecuting(k) => write!(f, "GroupExecuting({k})"),
            Self::Complete => f.write_str("Complete"),
            Self::Failed => f.write_str("Failed"),
        }
    }
}
