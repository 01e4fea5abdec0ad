//! Throttling-aware retry for remote control plane calls.
//!
//! Every remote call the runner makes (role assumption, module actions) goes
//! through [`RetryingInvoker`]. Errors are classified by [`Classify`]: rate
//! limiting is retried with exponential backoff plus jitter up to a bounded
//! number of attempts, everything else is returned to the caller unchanged.
//!
//! # Modules
//!
//! - [`backoff`] - Backoff schedule with jitter
//! - [`classify`] - Throttling vs terminal classification
//! - [`invoker`] - The retry loop itself

pub mod backoff;
pub mod classify;
pub mod invoker;

pub use backoff::BackoffPolicy;
pub use classify::{Classify, ErrorClass, RemoteError, classify_code};
pub use invoker::{RetryError, RetryingInvoker};
