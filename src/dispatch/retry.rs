use std::time::Duration;

use crate::config::ClientConfig;

use super::error::AttemptError;

/// Attempt bound and linear backoff.
///
/// `max_attempts` counts every attempt including the first. The delay after
/// the zero-based attempt `n` is `base_delay * (n + 1)`; there is no delay
/// after the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// A zero bound is raised to one attempt.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay.as_duration())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Sleep before the next attempt, `None` once `attempt` was the last one.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_attempts {
            return None;
        }
        Some(self.base_delay.saturating_mul(attempt + 1))
    }
}

/// Progress of one logical call. Dropped on success or exhaustion.
#[derive(Debug, Default)]
pub struct RetryState {
    attempt: u32,
    last_error: Option<AttemptError>,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based index of the current attempt.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn last_error(&self) -> Option<&AttemptError> {
        self.last_error.as_ref()
    }

    pub fn record_failure(&mut self, error: AttemptError) {
        self.last_error = Some(error);
    }

    pub fn advance(&mut self) {
        self.attempt += 1;
    }
}
