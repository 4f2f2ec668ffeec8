//! Retry policy for unreliable endpoints
//!
//! Only the IP resolver retries; provider calls surface their first failure.
//! The policy is a plain value so the same curve can be injected wherever a
//! bounded retry loop is needed.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default number of attempts against the IP echo service
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Default timeout applied to a single attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) * (1 + jitter)`, jitter within ±25%.
///
/// With a factor of 2 and ±25% jitter the smallest next delay (1.5x) is still
/// larger than the largest current one (1.25x), so delays strictly increase
/// until the cap is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
    seed: f64,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.subsec_nanos())
            .unwrap_or_default();
        Self::with_seed(initial, max, f64::from(nanos % 10_000) + f64::from(std::process::id()))
    }

    /// Backoff with a fixed jitter seed (reproducible delays)
    pub fn with_seed(initial: Duration, max: Duration, seed: f64) -> Self {
        Self {
            initial,
            max: max.max(initial),
            seed,
        }
    }

    /// Delay to wait after the given zero-based failed attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = self.initial.as_secs_f64() * 2.0_f64.powi(exponent);
        let capped = base.min(self.max.as_secs_f64());

        // Not cryptographically random, only needs to spread clients apart
        let jitter_factor = 1.0 + 0.25 * ((f64::from(attempt) + self.seed) * 7.3).sin();

        Duration::from_secs_f64((capped * jitter_factor).max(0.0))
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(250), Duration::from_secs(10))
    }
}

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: usize,

    /// Timeout applied to each attempt
    pub attempt_timeout: Duration,

    /// Delay curve between attempts
    pub backoff: ExponentialBackoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Delay before the attempt following `attempt` (zero-based), or `None`
    /// once the budget is spent
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            return None;
        }
        Some(self.backoff.delay(u32::try_from(attempt).unwrap_or(u32::MAX)))
    }

    /// Worst-case time spent sleeping between attempts
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_attempts)
            .filter_map(|attempt| self.delay_after(attempt))
            .sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            backoff: ExponentialBackoff::default(),
        }
    }
}
