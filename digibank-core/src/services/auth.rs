//! Authentication service - credential checks gated by the login throttle

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::{validation, User};
use crate::ports::{PasswordHasher, UserStore};
use crate::services::throttle::LoginThrottle;

const WRONG_CREDENTIALS: &str = "Wrong email or password";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    throttle: LoginThrottle,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        throttle: LoginThrottle,
    ) -> Self {
        Self {
            users,
            hasher,
            throttle,
        }
    }

    pub fn login(&self, credentials: &Credentials) -> Result<User> {
        self.login_at(credentials, Utc::now())
    }

    /// Verify credentials at `now`
    ///
    /// The throttle record is read before the credential check and the gate
    /// is evaluated against that snapshot, so a locked identifier is refused
    /// even when this attempt's credentials are right.
    pub fn login_at(&self, credentials: &Credentials, now: DateTime<Utc>) -> Result<User> {
        let email = validation::required(&credentials.email, "Email")?;
        validation::password_present(&credentials.password, "Password")?;
        let identifier = User::normalize_email(&email);

        let snapshot = self.throttle.snapshot(&identifier)?;
        let user = self.check_credentials(&identifier, &credentials.password)?;

        if let Err(locked) = LoginThrottle::check_gate(snapshot.as_ref(), now) {
            tracing::warn!(email = %identifier, "login refused, identifier locked out");
            return Err(locked);
        }

        match user {
            Some(user) => {
                self.throttle.reset(&identifier)?;
                tracing::info!(user_id = %user.id, "login succeeded");
                Ok(user)
            }
            None => {
                let record = self.throttle.record_failure(&identifier, now)?;
                tracing::warn!(
                    email = %identifier,
                    attempts = record.attempts,
                    "login failed"
                );
                Err(Error::invalid_credentials(WRONG_CREDENTIALS))
            }
        }
    }

    fn check_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.users.get_user_by_email(email)? else {
            return Ok(None);
        };
        if self.hasher.verify(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::argon2::Argon2Hasher;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::adapters::memory::InMemoryThrottleStore;
    use crate::config::HashingConfig;
    use chrono::Duration;

    fn service() -> AuthService {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        let hasher = Arc::new(Argon2Hasher::new(&HashingConfig::fast()).unwrap());
        let user = User::new("Ops", "ops@bank.example", hasher.hash("Passw0rd!").unwrap());
        crate::ports::UserStore::create_user(&repo, &user).unwrap();

        AuthService::new(
            Arc::new(repo),
            hasher,
            LoginThrottle::new(Arc::new(InMemoryThrottleStore::new())),
        )
    }

    fn creds(password: &str) -> Credentials {
        Credentials {
            email: "OPS@bank.example".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_success() {
        let svc = service();
        let user = svc.login(&creds("Passw0rd!")).unwrap();
        assert_eq!(user.email, "ops@bank.example");
    }

    #[test]
    fn test_unknown_email_is_generic_failure() {
        let svc = service();
        let err = svc
            .login(&Credentials {
                email: "nobody@bank.example".to_string(),
                password: "x".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Wrong email or password");
    }

    #[test]
    fn test_sixth_attempt_locked_even_with_correct_password() {
        let svc = service();
        let t0 = Utc::now();
        for i in 0..5 {
            let err = svc.login_at(&creds("bad"), t0 + Duration::seconds(i)).unwrap_err();
            assert!(matches!(err, Error::InvalidCredentials(_)));
        }

        let err = svc
            .login_at(&creds("Passw0rd!"), t0 + Duration::minutes(1))
            .unwrap_err();
        match err {
            Error::LockedOut { wait_minutes } => assert_eq!(wait_minutes, 30),
            other => panic!("expected lockout, got {other:?}"),
        }

        // Window elapsed: correct credentials get through and clear the record
        let later = t0 + Duration::minutes(31);
        svc.login_at(&creds("Passw0rd!"), later).unwrap();
        svc.login_at(&creds("bad"), later).unwrap_err();
        svc.login_at(&creds("Passw0rd!"), later).unwrap();
    }

    #[test]
    fn test_success_resets_counter() {
        let svc = service();
        let t0 = Utc::now();
        for _ in 0..4 {
            svc.login_at(&creds("bad"), t0).unwrap_err();
        }
        svc.login_at(&creds("Passw0rd!"), t0).unwrap();
        for _ in 0..4 {
            svc.login_at(&creds("bad"), t0).unwrap_err();
        }
        // Only four failures since the reset, so not locked
        svc.login_at(&creds("Passw0rd!"), t0).unwrap();
    }
}
