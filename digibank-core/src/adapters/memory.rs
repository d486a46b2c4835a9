//! In-memory login throttle store
//!
//! Records live for the lifetime of the process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::result::{Error, Result};
use crate::domain::LoginAttempt;
use crate::ports::ThrottleStore;

#[derive(Default)]
pub struct InMemoryThrottleStore {
    records: Mutex<HashMap<String, LoginAttempt>>,
}

impl InMemoryThrottleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<String, LoginAttempt>>> {
        self.records
            .lock()
            .map_err(|_| Error::OperationFailed("throttle store mutex poisoned".to_string()))
    }
}

impl ThrottleStore for InMemoryThrottleStore {
    fn get(&self, identifier: &str) -> Result<Option<LoginAttempt>> {
        Ok(self.records()?.get(identifier).copied())
    }

    fn record_failure(&self, identifier: &str, now: DateTime<Utc>) -> Result<LoginAttempt> {
        let mut records = self.records()?;
        let next = match records.get(identifier) {
            Some(existing) => existing.next(now),
            None => LoginAttempt::first(now),
        };
        records.insert(identifier.to_string(), next);
        Ok(next)
    }

    fn clear(&self, identifier: &str) -> Result<()> {
        self.records()?.remove(identifier);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_and_clear() {
        let store = InMemoryThrottleStore::new();
        let now = Utc::now();
        assert!(store.get("a@b.c").unwrap().is_none());

        store.record_failure("a@b.c", now).unwrap();
        let second = store.record_failure("a@b.c", now).unwrap();
        assert_eq!(second.attempts, 2);
        assert_eq!(store.get("a@b.c").unwrap(), Some(second));

        store.clear("a@b.c").unwrap();
        assert!(store.get("a@b.c").unwrap().is_none());
    }

    #[test]
    fn test_concurrent_failures_are_all_counted() {
        let store = Arc::new(InMemoryThrottleStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.record_failure("x@y.z", Utc::now()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get("x@y.z").unwrap().unwrap().attempts, 200);
    }
}
