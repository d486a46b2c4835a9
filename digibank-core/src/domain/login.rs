//! Failed-login bookkeeping

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Failures needed before an identifier is locked
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Length of the lockout window, counted from the last failure
pub const LOCKOUT_WINDOW_MINUTES: i64 = 30;

/// Failed login attempts recorded for one identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    pub attempts: u32,
    pub last_attempt: DateTime<Utc>,
}

impl LoginAttempt {
    /// First recorded failure
    pub fn first(now: DateTime<Utc>) -> Self {
        Self {
            attempts: 1,
            last_attempt: now,
        }
    }

    /// Record another failure
    pub fn next(self, now: DateTime<Utc>) -> Self {
        Self {
            attempts: self.attempts.saturating_add(1),
            last_attempt: now,
        }
    }

    /// Time left on the lock, or `None` if the identifier may attempt a login
    pub fn lock_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.attempts < MAX_FAILED_ATTEMPTS {
            return None;
        }
        let elapsed = now - self.last_attempt;
        let window = Duration::minutes(LOCKOUT_WINDOW_MINUTES);
        if elapsed < window {
            Some(window - elapsed)
        } else {
            None
        }
    }
}

/// Whole minutes to wait, rounded up
pub fn wait_minutes(remaining: Duration) -> i64 {
    let millis = remaining.num_milliseconds().max(0);
    (millis + 59_999) / 60_000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-24T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_below_threshold_is_never_locked() {
        let mut record = LoginAttempt::first(t0());
        for _ in 0..3 {
            record = record.next(t0());
        }
        assert_eq!(record.attempts, 4);
        assert!(record.lock_remaining(t0()).is_none());
    }

    #[test]
    fn test_locked_inside_window() {
        let record = LoginAttempt {
            attempts: 5,
            last_attempt: t0(),
        };
        let remaining = record.lock_remaining(t0() + Duration::minutes(10)).unwrap();
        assert_eq!(remaining, Duration::minutes(20));
        assert!(record.lock_remaining(t0() + Duration::minutes(30)).is_none());
    }

    #[test]
    fn test_wait_minutes_rounds_up() {
        assert_eq!(wait_minutes(Duration::minutes(20)), 20);
        assert_eq!(wait_minutes(Duration::seconds(19 * 60 + 1)), 20);
        assert_eq!(wait_minutes(Duration::seconds(1)), 1);
        assert_eq!(wait_minutes(Duration::zero()), 0);
    }
}
