//! Retry configuration and backoff computation.

use rand::Rng;
use std::time::Duration;

/// Shift cap keeping `min_wait << attempt` inside u64 millis.
const MAX_BACKOFF_SHIFT: u32 = 20;

/// Bounds for the gateway's retry loop.
///
/// An explicit value passed into the gateway at construction; defaults
/// match the upstream operations guidance of up to ten attempts spread
/// between one second and one minute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Lower bound for any backoff wait.
    pub min_wait: Duration,
    /// Upper bound for any backoff wait.
    pub max_wait: Duration,
}

impl RetryConfig {
    /// Creates a configuration with explicit bounds.
    #[must_use]
    pub const fn new(max_attempts: u32, min_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_attempts,
            min_wait,
            max_wait,
        }
    }

    /// Computes the randomized exponential wait after `attempt` failed
    /// attempts: uniform between `min_wait` and
    /// `min(max_wait, min_wait * 2^attempt)`.
    #[must_use]
    pub fn backoff_wait(&self, attempt: u32) -> Duration {
        let floor = self.min_wait.as_millis() as u64;
        let ceiling = self.max_wait.as_millis() as u64;

        let exponential = floor.saturating_mul(1u64 << attempt.min(MAX_BACKOFF_SHIFT));
        let upper = exponential.min(ceiling).max(floor);

        let wait_ms = rand::thread_rng().gen_range(floor..=upper);
        Duration::from_millis(wait_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(1), Duration::from_secs(60))
    }
}
