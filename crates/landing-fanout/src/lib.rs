//! Bounded-concurrency fan-out over (account, region) targets.
//!
//! [`FanOutExecutor`] applies one idempotent action to a list of targets with
//! at most `concurrency` actions in flight. Per-target failures are isolated
//! into `<target>: ERROR - <message>` lines of the [`FanOutReport`]; modules
//! that must abort on a condition use [`FanOutExecutor::run_checked`], which
//! evaluates every target before failing.

mod error;
mod executor;
mod report;

pub use error::{FanOutError, FanOutResult};
pub use executor::{FanOutExecutor, TargetCheck};
pub use report::FanOutReport;
