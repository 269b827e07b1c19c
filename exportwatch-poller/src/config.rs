//! Poller configuration
//!
//! Defines the tunables of an export watch: which export to follow, where
//! the export service lives, how often to poll and how hard to retry.

use exportwatch_core::domain::export::ExportId;
use std::time::Duration;

/// Default delay between two polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Poller configuration
///
/// Intervals are configurable to allow tuning for different deployment
/// scenarios (local dev server vs. a slow export backend).
#[derive(Debug, Clone)]
pub struct Config {
    /// Export job to follow
    pub export_id: ExportId,

    /// Export service base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Delay before the first poll and between two successful polls
    pub poll_interval: Duration,

    /// Upper bound for a single status request
    pub request_timeout: Duration,

    /// Consecutive failed polls before giving up; 0 retries forever
    pub max_consecutive_failures: u32,

    /// Cap for the retry delay after failed polls
    pub max_backoff: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(export_id: ExportId, base_url: String) -> Self {
        Self {
            export_id,
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(30),
            max_consecutive_failures: 5,
            max_backoff: Duration::from_secs(60),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Delay before the next poll after `failures` consecutive failed polls
    ///
    /// Doubles the poll interval per failure, capped at `max_backoff`.
    pub fn backoff_delay(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(16);
        self.poll_interval
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }

    /// Whether the poller should stop after `failures` consecutive failures
    pub fn gives_up_after(&self, failures: u32) -> bool {
        self.max_consecutive_failures > 0 && failures >= self.max_consecutive_failures
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.max_backoff < self.poll_interval {
            anyhow::bail!("max_backoff cannot be shorter than poll_interval");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(
            ExportId::new("export-1").unwrap(),
            "http://localhost:8000".to_string(),
        )
    }

    #[test]
    fn test_default_config() {
        let config = config();
        assert_eq!(config.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_consecutive_failures, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();

        // Invalid URL should fail
        config.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://exports.example.com".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.poll_interval = Duration::from_secs(120);
        assert!(config.validate().is_err(), "backoff cap below interval");

        config.max_backoff = Duration::from_secs(120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut config = config().with_poll_interval(Duration::from_millis(1000));
        config.max_backoff = Duration::from_millis(5000);

        assert_eq!(config.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(config.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(4000));
        assert_eq!(config.backoff_delay(4), Duration::from_millis(5000));
        assert_eq!(config.backoff_delay(u32::MAX), Duration::from_millis(5000));
    }

    #[test]
    fn test_gives_up_after() {
        let mut config = config();
        assert!(!config.gives_up_after(4));
        assert!(config.gives_up_after(5));

        config.max_consecutive_failures = 0;
        assert!(!config.gives_up_after(1000));
    }
}
