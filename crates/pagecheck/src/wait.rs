//! Implicit wait for element lookups.
//!
//! Lookups poll the driver until at least one element matches or the wait
//! elapses. Nothing else waits: comparisons run once against whatever the
//! page holds at that moment.

use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Default implicit wait (10 seconds)
pub const DEFAULT_IMPLICIT_WAIT: Duration = Duration::from_secs(10);

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timeout and polling interval for lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Maximum time a lookup polls before reporting not-found
    pub timeout: Duration,
    /// Delay between polls
    pub poll_interval: Duration,
}

impl WaitConfig {
    /// Create a new wait configuration
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Custom timeout with the default poll interval
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }

    /// No waiting: a lookup is tried exactly once
    #[must_use]
    pub const fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Start a deadline for one lookup
    #[must_use]
    pub fn start(self) -> Deadline {
        Deadline {
            started: Instant::now(),
            config: self,
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_IMPLICIT_WAIT, DEFAULT_POLL_INTERVAL)
    }
}

/// A running implicit wait
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    config: WaitConfig,
}

impl Deadline {
    /// Whether the wait has run out
    #[must_use]
    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.config.timeout
    }

    /// Time spent so far
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Sleep one poll interval, never past the deadline
    pub async fn pause(&self) {
        let remaining = self.config.timeout.saturating_sub(self.started.elapsed());
        sleep(self.config.poll_interval.min(remaining)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wait() {
        let config = WaitConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_immediate_is_expired_at_once() {
        let deadline = WaitConfig::immediate().start();
        assert!(deadline.expired());
    }

    #[test]
    fn test_with_timeout_keeps_default_poll() {
        let config = WaitConfig::with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test]
    async fn test_deadline_expires_after_timeout() {
        let deadline =
            WaitConfig::new(Duration::from_millis(30), Duration::from_millis(10)).start();
        assert!(!deadline.expired());
        while !deadline.expired() {
            deadline.pause().await;
        }
        assert!(deadline.elapsed() >= Duration::from_millis(30));
    }
}
