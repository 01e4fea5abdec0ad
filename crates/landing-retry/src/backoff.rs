//! Exponential backoff with jitter.

use std::time::Duration;

/// Backoff schedule for throttled calls.
///
/// The nominal delay before retry `n` (1-based) is `base_delay * 2^(n-1)`,
/// capped at `max_delay`. The actual sleep keeps half of the nominal delay and
/// randomizes the other half so concurrent callers spread out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl BackoffPolicy {
    /// Create a policy. `max_attempts` counts every invocation, including the first.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    /// Total number of invocations allowed.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Nominal (un-jittered) delay before the given retry.
    #[must_use]
    pub fn nominal_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1_u32 << exponent)
            .min(self.max_delay)
    }

    /// Delay before the given retry with jitter applied.
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let nominal = self.nominal_delay(retry);
        let half = nominal / 2;
        half + half.mul_f64(rand::random::<f64>())
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(8, Duration::from_millis(150), Duration::from_secs(10))
    }
}
