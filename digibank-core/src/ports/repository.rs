//! Repository ports - persistence abstraction for accounts and users

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Account, User};

/// One conditional balance write: applies only if the stored version still
/// equals `expected_version`, and bumps the version when it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceWrite {
    pub id: Uuid,
    pub expected_version: i64,
    pub new_balance: Decimal,
}

/// Bank account storage
///
/// Methods returning `bool` report whether a row was affected.
pub trait AccountStore: Send + Sync {
    // === Reads ===

    fn get_account(&self, id: Uuid) -> Result<Option<Account>>;

    fn get_account_by_number(&self, account_number: &str) -> Result<Option<Account>>;

    /// All accounts, in insertion order
    fn list_accounts(&self) -> Result<Vec<Account>>;

    // === Writes ===

    /// Insert a new account; fails with `Duplicate` if the number is taken
    fn create_account(&self, account: &Account) -> Result<()>;

    fn update_account_details(&self, id: Uuid, owner_name: &str, account_number: &str) -> Result<bool>;

    fn update_account_password(&self, id: Uuid, password_hash: &str) -> Result<bool>;

    fn delete_account(&self, id: Uuid) -> Result<bool>;

    // === Balances ===

    /// Compare-and-swap on the account version
    fn conditional_update_balance(&self, write: BalanceWrite) -> Result<bool>;

    /// Apply both writes atomically; returns false (and changes nothing)
    /// if either one misses its expected version
    fn transfer_balance(&self, source: BalanceWrite, target: BalanceWrite) -> Result<bool>;
}

/// User storage
pub trait UserStore: Send + Sync {
    fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Lookup by normalized (lowercase) email
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    fn list_users(&self) -> Result<Vec<User>>;

    /// Insert a new user; fails with `Duplicate` if the email is taken
    fn create_user(&self, user: &User) -> Result<()>;

    fn update_user_details(&self, id: Uuid, name: &str, email: &str) -> Result<bool>;

    fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<bool>;

    fn delete_user(&self, id: Uuid) -> Result<bool>;
}
