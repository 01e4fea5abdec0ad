//! Status lines reported by the runner and by modules.

use std::fmt::Display;

/// Reported when a named stage has nothing to run.
#[must_use]
pub fn no_modules(stage: &str) -> String {
    format!("No modules found for stage \"{stage}\"")
}

/// Returned by a module whose own preconditions are not met.
#[must_use]
pub fn skipped(module: &str, reason: impl Display) -> String {
    format!("Module \"{module}\" execution skipped, {reason}")
}

/// Returned by a module that finished; `outcomes` is usually a fan-out report.
#[must_use]
pub fn completed(module: &str, outcomes: impl Display) -> String {
    format!("Module \"{module}\" completed successfully with status {outcomes}")
}

/// Recorded for a rejected module when the run tolerates module failures.
#[must_use]
pub fn failed(module: &str, error: impl Display) -> String {
    format!("Module \"{module}\" failed: {error}")
}
