//! Seed service - default records for a fresh installation

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{validation, Account, User};
use crate::ports::{AccountStore, PasswordHasher, UserStore};

pub const DEFAULT_OWNER: &str = "Administrator";
pub const DEFAULT_ACCOUNT_NUMBER: &str = "123456789";
pub const DEFAULT_BANK: &str = "ABC";
pub const DEFAULT_BALANCE: i64 = 50_000;
/// Initial password of the default account; operators are expected to change it
pub const DEFAULT_ACCOUNT_PASSWORD: &str = "123456";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeedOutcome {
    Created { id: String },
    AlreadyExists { id: String },
}

pub struct SeedService {
    accounts: Arc<dyn AccountStore>,
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl SeedService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            accounts,
            users,
            hasher,
        }
    }

    /// Create the default bank account unless its number is already taken
    pub fn seed_default_account(&self) -> Result<SeedOutcome> {
        if let Some(existing) = self.accounts.get_account_by_number(DEFAULT_ACCOUNT_NUMBER)? {
            tracing::info!(account_number = DEFAULT_ACCOUNT_NUMBER, "default account already exists");
            return Ok(SeedOutcome::AlreadyExists {
                id: existing.id.to_string(),
            });
        }

        let account = Account::new(
            DEFAULT_OWNER,
            DEFAULT_ACCOUNT_NUMBER,
            DEFAULT_BANK,
            Decimal::new(DEFAULT_BALANCE, 0),
            self.hasher.hash(DEFAULT_ACCOUNT_PASSWORD)?,
        );
        self.accounts.create_account(&account)?;
        tracing::info!(account_id = %account.id, "created default bank account");
        Ok(SeedOutcome::Created {
            id: account.id.to_string(),
        })
    }

    /// Create an operator user who can log in to the API
    pub fn seed_operator(&self, name: &str, email: &str, password: &str) -> Result<SeedOutcome> {
        let name = validation::user_name(name)?;
        let email = validation::email(email)?;
        validation::password_policy(password, "Password")?;

        if let Some(existing) = self.users.get_user_by_email(&email)? {
            tracing::info!(email = %email, "operator already exists");
            return Ok(SeedOutcome::AlreadyExists {
                id: existing.id.to_string(),
            });
        }

        let user = User::new(name, email, self.hasher.hash(password)?);
        self.users.create_user(&user)?;
        tracing::info!(user_id = %user.id, "created operator user");
        Ok(SeedOutcome::Created {
            id: user.id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::argon2::Argon2Hasher;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::config::HashingConfig;
    use crate::domain::result::Error;

    fn service() -> (SeedService, Arc<DuckDbRepository>) {
        let repo = Arc::new(DuckDbRepository::open_in_memory().unwrap());
        repo.ensure_schema().unwrap();
        let hasher = Arc::new(Argon2Hasher::new(&HashingConfig::fast()).unwrap());
        (SeedService::new(repo.clone(), repo.clone(), hasher), repo)
    }

    #[test]
    fn test_default_account_is_idempotent() {
        let (seed, repo) = service();
        let first = seed.seed_default_account().unwrap();
        let second = seed.seed_default_account().unwrap();

        let SeedOutcome::Created { id } = first else {
            panic!("first run should create");
        };
        assert_eq!(second, SeedOutcome::AlreadyExists { id });

        let account = repo.get_account_by_number(DEFAULT_ACCOUNT_NUMBER).unwrap().unwrap();
        assert_eq!(account.owner_name, "ADMINISTRATOR");
        assert_eq!(account.balance, Decimal::new(50_000, 0));
        assert_eq!(repo.list_accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_operator_needs_strong_password() {
        let (seed, repo) = service();
        assert!(matches!(
            seed.seed_operator("Ops", "ops@bank.example", "weak"),
            Err(Error::Validation(_))
        ));
        let outcome = seed.seed_operator("Ops", "ops@bank.example", "Str0ng!pw").unwrap();
        assert!(matches!(outcome, SeedOutcome::Created { .. }));
        assert!(matches!(
            seed.seed_operator("Ops", "OPS@bank.example", "Str0ng!pw").unwrap(),
            SeedOutcome::AlreadyExists { .. }
        ));
        assert_eq!(repo.list_users().unwrap().len(), 1);
    }
}
