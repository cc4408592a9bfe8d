//! Bounded, fixed-delay reconnection policy.
//!
//! Retries are linear: every attempt waits the same [`ReconnectPolicy::delay`]
//! and the manager gives up for good once the attempt counter passes
//! [`ReconnectPolicy::max_attempts`]. The counter is reset by a successful
//! connect.

use std::time::Duration;

/// Tunable parameters for reconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Retries allowed before giving up (default: `5`).
    pub max_attempts: u32,
    /// Wait before every retry (default: 5 seconds).
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

impl ReconnectPolicy {
    /// Delay to wait before retry number `attempt` (1-based), or `None` once
    /// the budget is exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        (attempt >= 1 && attempt <= self.max_attempts).then_some(self.delay)
    }
}
