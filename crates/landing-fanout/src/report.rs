//! Aggregated per-target outcomes.

use std::fmt;

use landing_core::ExecutionOutcome;

/// Outcomes of one fan-out, in the order targets finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    outcomes: Vec<ExecutionOutcome>,
}

impl FanOutReport {
    /// Build a report from already collected outcomes.
    #[must_use]
    pub fn new(outcomes: Vec<ExecutionOutcome>) -> Self {
        Self { outcomes }
    }

    /// All outcomes in completion order.
    #[must_use]
    pub fn outcomes(&self) -> &[ExecutionOutcome] {
        &self.outcomes
    }

    /// Outcomes of targets whose action failed.
    pub fn failures(&self) -> impl Iterator<Item = &ExecutionOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }

    /// Number of targets in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no target ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl fmt::Display for FanOutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{outcome}")?;
        }
        Ok(())
    }
}
