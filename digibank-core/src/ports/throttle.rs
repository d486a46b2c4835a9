//! Login throttle storage port

use chrono::{DateTime, Utc};

use crate::domain::result::Result;
use crate::domain::LoginAttempt;

/// Failed-login records keyed by login identifier
///
/// `record_failure` must be atomic per identifier so that concurrent
/// failures are never under-counted.
pub trait ThrottleStore: Send + Sync {
    fn get(&self, identifier: &str) -> Result<Option<LoginAttempt>>;

    /// Create or bump the record and return its new state
    fn record_failure(&self, identifier: &str, now: DateTime<Utc>) -> Result<LoginAttempt>;

    fn clear(&self, identifier: &str) -> Result<()>;
}
