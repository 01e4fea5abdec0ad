//! Fan-out error types.

use landing_core::ExecutionOutcome;

use crate::report::FanOutReport;

/// Errors raised by fail-fast fan-outs.
#[derive(Debug, thiserror::Error)]
pub enum FanOutError {
    /// One or more targets failed their check; every target still ran.
    #[error("check failed for {} target(s): {}", failures.len(), describe(failures))]
    ChecksFailed {
        /// The failing targets with their reasons.
        failures: Vec<ExecutionOutcome>,
        /// The full report, including passing targets and isolated errors.
        report: FanOutReport,
    },
}

/// Result type alias for fan-out operations.
pub type FanOutResult<T> = Result<T, FanOutError>;

fn describe(failures: &[ExecutionOutcome]) -> String {
    failures
        .iter()
        .map(|o| format!("{} ({})", o.target, o.message))
        .collect::<Vec<_>>()
        .join("; ")
}
