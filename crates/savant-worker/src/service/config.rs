//! Worker configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default durable consumer name.
const DEFAULT_CONSUMER_NAME: &str = "ingest-worker";

/// Default sleep between polls when the queue is empty.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Default lease duration for a dequeued job.
const DEFAULT_VISIBILITY_TIMEOUT_SECS: u64 = 300;

/// Default consecutive-failure threshold before the breaker trips.
const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Default cooldown once the breaker trips.
const DEFAULT_COOLDOWN_SECS: u64 = 60;

/// Configuration for the ingest worker loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct WorkerConfig {
    /// Durable consumer name for this worker instance
    #[cfg_attr(
        feature = "config",
        arg(
            long = "consumer-name",
            env = "WORKER_CONSUMER_NAME",
            default_value = DEFAULT_CONSUMER_NAME
        )
    )]
    #[serde(default = "default_consumer_name")]
    pub consumer_name: String,

    /// Sleep between polls when no jobs are available, in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "poll-interval",
            env = "WORKER_POLL_INTERVAL_SECS",
            default_value_t = DEFAULT_POLL_INTERVAL_SECS
        )
    )]
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Visibility timeout for leased jobs, in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "visibility-timeout",
            env = "WORKER_VISIBILITY_TIMEOUT_SECS",
            default_value_t = DEFAULT_VISIBILITY_TIMEOUT_SECS
        )
    )]
    #[serde(default = "default_visibility_timeout_secs")]
    pub visibility_timeout_secs: u64,

    /// Consecutive processing failures before polling pauses
    #[cfg_attr(
        feature = "config",
        arg(
            long = "max-consecutive-failures",
            env = "WORKER_MAX_CONSECUTIVE_FAILURES",
            default_value_t = DEFAULT_MAX_CONSECUTIVE_FAILURES
        )
    )]
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// Pause duration after repeated failures, in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "cooldown",
            env = "WORKER_COOLDOWN_SECS",
            default_value_t = DEFAULT_COOLDOWN_SECS
        )
    )]
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

fn default_consumer_name() -> String {
    DEFAULT_CONSUMER_NAME.to_string()
}

const fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

const fn default_visibility_timeout_secs() -> u64 {
    DEFAULT_VISIBILITY_TIMEOUT_SECS
}

const fn default_max_consecutive_failures() -> u32 {
    DEFAULT_MAX_CONSECUTIVE_FAILURES
}

const fn default_cooldown_secs() -> u64 {
    DEFAULT_COOLDOWN_SECS
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            consumer_name: default_consumer_name(),
            poll_interval_secs: default_poll_interval_secs(),
            visibility_timeout_secs: default_visibility_timeout_secs(),
            max_consecutive_failures: default_max_consecutive_failures(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl WorkerConfig {
    /// Returns the idle poll interval.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Returns the job visibility timeout.
    #[inline]
    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.visibility_timeout_secs)
    }

    /// Returns the circuit-breaker cooldown.
    #[inline]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Sets the consumer name.
    #[must_use]
    pub fn with_consumer_name(mut self, consumer_name: impl Into<String>) -> Self {
        self.consumer_name = consumer_name.into();
        self
    }

    /// Sets the idle poll interval in seconds.
    #[must_use]
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Sets the visibility timeout in seconds.
    #[must_use]
    pub fn with_visibility_timeout_secs(mut self, secs: u64) -> Self {
        self.visibility_timeout_secs = secs;
        self
    }

    /// Sets the consecutive-failure threshold.
    #[must_use]
    pub fn with_max_consecutive_failures(mut self, failures: u32) -> Self {
        self.max_consecutive_failures = failures;
        self
    }

    /// Sets the cooldown in seconds.
    #[must_use]
    pub fn with_cooldown_secs(mut self, secs: u64) -> Self {
        self.cooldown_secs = secs;
        self
    }

    /// Validate the configuration and return any issues.
    pub fn validate(&self) -> Result<(), String> {
        if self.consumer_name.is_empty() {
            return Err("Consumer name must not be empty".to_string());
        }
        if self.visibility_timeout_secs == 0 {
            return Err("Visibility timeout must be positive".to_string());
        }
        if self.max_consecutive_failures == 0 {
            return Err("Failure threshold must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.consumer_name, "ingest-worker");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.visibility_timeout(), Duration::from_secs(300));
        assert_eq!(config.max_consecutive_failures, 5);
        assert_eq!(config.cooldown(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = WorkerConfig::default()
            .with_consumer_name("worker-2")
            .with_poll_interval_secs(1)
            .with_visibility_timeout_secs(30)
            .with_max_consecutive_failures(3)
            .with_cooldown_secs(10);

        assert_eq!(config.consumer_name, "worker-2");
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.visibility_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_consecutive_failures, 3);
        assert_eq!(config.cooldown(), Duration::from_secs(10));
    }

    #[test]
    fn test_validation() {
        assert!(
            WorkerConfig::default()
                .with_consumer_name("")
                .validate()
                .is_err()
        );
        assert!(
            WorkerConfig::default()
                .with_visibility_timeout_secs(0)
                .validate()
                .is_err()
        );
        assert!(
            WorkerConfig::default()
                .with_max_consecutive_failures(0)
                .validate()
                .is_err()
        );
    }
}
