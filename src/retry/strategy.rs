//! Retry strategies decide, after a failed attempt, whether to try again and
//! how long to wait first.

use std::time::Duration;

use crate::defaults;
use crate::error::GeneratorError;

/// Outcome of a retry decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up and propagate the failure.
    Stop,
    /// Re-send after the given delay.
    RetryAfter(Duration),
}

/// Stateless retry policy, shared by every in-flight call of a generator.
pub trait RetryStrategy: Send + Sync {
    /// `attempt` is the 1-based number of the attempt that just failed.
    fn should_retry(&self, attempt: u32, failure: &GeneratorError) -> RetryDecision;
}

/// Fixed delay between attempts, bounded attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearRetryStrategy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for LinearRetryStrategy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::retry::MAX_ATTEMPTS,
            delay: defaults::retry::DELAY,
        }
    }
}

impl LinearRetryStrategy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl RetryStrategy for LinearRetryStrategy {
    fn should_retry(&self, attempt: u32, _failure: &GeneratorError) -> RetryDecision {
        if attempt >= self.max_attempts {
            RetryDecision::Stop
        } else {
            RetryDecision::RetryAfter(self.delay)
        }
    }
}
