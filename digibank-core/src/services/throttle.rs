//! Login throttle - gates logins after repeated failures
//!
//! An identifier is locked once it has `MAX_FAILED_ATTEMPTS` failures and the
//! last one is less than `LOCKOUT_WINDOW_MINUTES` old. Only a successful
//! login removes the record.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::login::{wait_minutes, LoginAttempt};
use crate::domain::result::{Error, Result};
use crate::ports::ThrottleStore;

pub struct LoginThrottle {
    store: Arc<dyn ThrottleStore>,
}

impl LoginThrottle {
    pub fn new(store: Arc<dyn ThrottleStore>) -> Self {
        Self { store }
    }

    /// Current record for `identifier`, if any
    pub fn snapshot(&self, identifier: &str) -> Result<Option<LoginAttempt>> {
        self.store.get(identifier)
    }

    /// Fail with `LockedOut` if `record` is inside the lockout window
    pub fn check_gate(record: Option<&LoginAttempt>, now: DateTime<Utc>) -> Result<()> {
        match record.and_then(|r| r.lock_remaining(now)) {
            Some(remaining) => Err(Error::LockedOut {
                wait_minutes: wait_minutes(remaining),
            }),
            None => Ok(()),
        }
    }

    pub fn record_failure(&self, identifier: &str, now: DateTime<Utc>) -> Result<LoginAttempt> {
        self.store.record_failure(identifier, now)
    }

    pub fn reset(&self, identifier: &str) -> Result<()> {
        self.store.clear(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryThrottleStore;
    use chrono::Duration;

    fn throttle() -> LoginThrottle {
        LoginThrottle::new(Arc::new(InMemoryThrottleStore::new()))
    }

    #[test]
    fn test_gate_engages_at_five() {
        let throttle = throttle();
        let now = Utc::now();
        for _ in 0..4 {
            throttle.record_failure("a@b.c", now).unwrap();
        }
        let record = throttle.snapshot("a@b.c").unwrap();
        assert!(LoginThrottle::check_gate(record.as_ref(), now).is_ok());

        throttle.record_failure("a@b.c", now).unwrap();
        let record = throttle.snapshot("a@b.c").unwrap();
        let err = LoginThrottle::check_gate(record.as_ref(), now + Duration::seconds(30)).unwrap_err();
        assert!(matches!(err, Error::LockedOut { wait_minutes: 30 }));

        let later = now + Duration::minutes(30);
        assert!(LoginThrottle::check_gate(record.as_ref(), later).is_ok());
    }

    #[test]
    fn test_reset_and_clean_state() {
        let throttle = throttle();
        assert!(LoginThrottle::check_gate(None, Utc::now()).is_ok());
        throttle.record_failure("a@b.c", Utc::now()).unwrap();
        throttle.reset("a@b.c").unwrap();
        assert!(throttle.snapshot("a@b.c").unwrap().is_none());
    }
}
