//! The retrying invoker wrapped around every remote call.

use std::future::Future;

use tracing::{debug, warn};

use crate::backoff::BackoffPolicy;
use crate::classify::{Classify, ErrorClass};

/// Why a retried call ultimately failed.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The call failed with a non-throttling error; it was not retried.
    #[error("{0}")]
    Terminal(E),

    /// The call kept being throttled until the attempt budget ran out.
    #[error("still throttled after {attempts} attempts: {source}")]
    Exhausted {
        /// Number of invocations made.
        attempts: u32,
        /// The last throttling error.
        source: E,
    },
}

impl<E> RetryError<E> {
    /// The underlying error, regardless of how the retry loop ended.
    pub fn into_inner(self) -> E {
        match self {
            Self::Terminal(e) | Self::Exhausted { source: e, .. } => e,
        }
    }

    /// Borrow the underlying error.
    pub fn inner(&self) -> &E {
        match self {
            Self::Terminal(e) | Self::Exhausted { source: e, .. } => e,
        }
    }
}

/// Invokes remote operations, retrying throttled ones with backoff.
///
/// # Examples
///
/// ```
/// use landing_retry::{RemoteError, RetryingInvoker};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let invoker = RetryingInvoker::default();
/// let value = invoker
///     .invoke(|| async { Ok::<_, RemoteError>(42) })
///     .await
///     .unwrap();
/// assert_eq!(value, 42);
/// # });
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryingInvoker {
    policy: BackoffPolicy,
}

impl RetryingInvoker {
    /// Create an invoker with the given backoff policy.
    #[must_use]
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }

    /// The backoff policy in use.
    #[must_use]
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds, fails terminally, or exhausts the attempt budget.
    pub async fn invoke<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + std::fmt::Display,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "remote call succeeded after throttling");
                    }
                    return Ok(value);
                }
                Err(e) => match e.classify() {
                    ErrorClass::Terminal => return Err(RetryError::Terminal(e)),
                    ErrorClass::Throttling if attempt >= max_attempts => {
                        warn!(attempts = attempt, error = %e, "giving up on throttled remote call");
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    ErrorClass::Throttling => {
                        let delay = self.policy.delay(attempt);
                        warn!(
                            attempt,
                            max_attempts,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            error = %e,
                            "remote call throttled, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                },
            }
        }
    }
}
