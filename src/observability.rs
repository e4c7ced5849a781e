//! Tracing setup and dispatch counters

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `level`; an unparsable `level` falls back to `info`.
/// Calling this twice is harmless: the second install is ignored.
pub fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(level, "Tracing initialized");
    }
}

/// Counters for dispatcher activity
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    attempts: AtomicU64,
    retries: AtomicU64,
    successes: AtomicU64,
    exhausted: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "attempts", "Metric incremented");
    }

    pub fn retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "retries", "Metric incremented");
    }

    pub fn success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "successes", "Metric incremented");
    }

    pub fn exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "exhausted", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub attempts: u64,
    pub retries: u64,
    pub successes: u64,
    pub exhausted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = DispatchMetrics::new();
        metrics.attempt();
        metrics.attempt();
        metrics.retry();
        metrics.success();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                attempts: 2,
                retries: 1,
                successes: 1,
                exhausted: 0,
            }
        );
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing("debug");
        init_tracing("not a filter [");
    }
}
