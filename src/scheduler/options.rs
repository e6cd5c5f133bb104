//! Options for periodic jobs

use std::time::Duration;

use crate::constants::cadence::DEFAULT_INTERVAL;

/// Cadence of a periodic job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTaskOptions {
    /// Time between two executions
    pub interval: Duration,
    /// Execute once right away instead of waiting for the first interval
    pub run_immediately: bool,
}

impl PeriodicTaskOptions {
    /// Run every `interval`, first execution after one interval
    #[must_use]
    pub const fn every(interval: Duration) -> Self {
        Self {
            interval,
            run_immediately: false,
        }
    }

    /// Also execute once at registration time
    #[must_use]
    pub const fn immediately(mut self) -> Self {
        self.run_immediately = true;
        self
    }

    /// Replace a zero interval with the default one
    ///
    /// `tokio::time::interval` panics on a zero period, so this is applied to
    /// every registration before the timer is built.
    #[must_use]
    pub(super) fn sanitized(self, job: &str) -> Self {
        if self.interval.is_zero() {
            tracing::warn!(
                job,
                default_secs = DEFAULT_INTERVAL.as_secs(),
                "Periodic task interval is zero, using default interval"
            );
            Self {
                interval: DEFAULT_INTERVAL,
                ..self
            }
        } else {
            self
        }
    }
}

impl Default for PeriodicTaskOptions {
    fn default() -> Self {
        Self::every(DEFAULT_INTERVAL)
    }
}
