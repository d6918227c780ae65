//! Reconnect backoff policy
//!
//! The default reproduces a fixed 5 second interval with no attempt limit.
//! A multiplier above 1.0 turns it into capped exponential backoff.

use std::time::Duration;

/// Delay schedule for printer reconnect attempts
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay after the first failed attempt
    pub initial_delay: Duration,
    /// Growth factor applied per attempt (1.0 = fixed interval)
    pub multiplier: f64,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Give up after this many failed attempts; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            multiplier: 1.0,
            max_delay: Duration::from_secs(60),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Fixed interval, unbounded
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_delay: interval,
            multiplier: 1.0,
            max_delay: interval,
            max_attempts: None,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = (max_attempts > 0).then_some(max_attempts);
        self
    }

    /// Delay to wait after `attempt` consecutive failures (1-based)
    ///
    /// delay = initial_delay * multiplier ^ (attempt - 1), capped at `max_delay`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let multiplier = if self.multiplier.is_finite() && self.multiplier >= 1.0 {
            self.multiplier
        } else {
            1.0
        };

        let delay_ms = self.initial_delay.as_millis() as f64 * multiplier.powi(exponent);
        let cap_ms = self.max_delay.max(self.initial_delay).as_millis() as f64;

        if !delay_ms.is_finite() || delay_ms >= cap_ms {
            self.max_delay.max(self.initial_delay)
        } else {
            Duration::from_millis(delay_ms as u64)
        }
    }

    /// Whether `attempts` failures use up the attempt budget
    #[must_use]
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fixed_five_seconds() {
        let policy = RetryPolicy::default();
        for attempt in 1..10 {
            assert_eq!(policy.delay_for_attempt(attempt), Duration::from_secs(5));
        }
        assert!(!policy.is_exhausted(u32::MAX));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_millis(500),
            max_attempts: None,
        };

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(200), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_max_attempts_means_unbounded() {
        let policy = RetryPolicy::default().with_max_attempts(0);
        assert_eq!(policy.max_attempts, None);

        let policy = RetryPolicy::default().with_max_attempts(3);
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));
    }

    #[test]
    fn test_bad_multiplier_falls_back_to_fixed() {
        let policy = RetryPolicy {
            multiplier: 0.5,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(5));
    }
}
