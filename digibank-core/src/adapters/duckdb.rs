//! DuckDB repository implementation

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, User};
use crate::ports::{AccountStore, BalanceWrite, UserStore};
use crate::services::{MigrationResult, MigrationService};

const ACCOUNT_COLUMNS: &str = "account_id, owner_name, account_number, bank,
        CAST(balance AS VARCHAR), password_hash, version, created_at, updated_at";

const USER_COLUMNS: &str = "user_id, name, email, password_hash, created_at, updated_at";

const BALANCE_UPDATE_SQL: &str = "UPDATE sys_bank_accounts
     SET balance = CAST(? AS DECIMAL(18,2)), version = version + 1, updated_at = ?
     WHERE account_id = ? AND version = ?";

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
}

impl DuckDbRepository {
    /// Open (or create) the database file at `db_path`
    pub fn new(db_path: &Path) -> Result<Self> {
        // Extension autoloading stays off; nothing here needs one
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::database("connection mutex poisoned"))
    }

    /// Run pending migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let result = self.run_migrations()?;
        if !result.applied.is_empty() {
            tracing::info!(applied = ?result.applied, "applied database migrations");
        }
        Ok(())
    }

    fn query_accounts(&self, filter: &str, param: Option<&str>) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM sys_bank_accounts {filter}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
            Some(p) => stmt.query_map([p], AccountRow::from_row)?.collect::<duckdb::Result<Vec<_>>>()?,
            None => stmt.query_map([], AccountRow::from_row)?.collect::<duckdb::Result<Vec<_>>>()?,
        };
        rows.into_iter().map(AccountRow::into_account).collect()
    }

    fn query_users(&self, filter: &str, param: Option<&str>) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {USER_COLUMNS} FROM sys_users {filter}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
            Some(p) => stmt.query_map([p], UserRow::from_row)?.collect::<duckdb::Result<Vec<_>>>()?,
            None => stmt.query_map([], UserRow::from_row)?.collect::<duckdb::Result<Vec<_>>>()?,
        };
        rows.into_iter().map(UserRow::into_user).collect()
    }
}

// === Account operations ===

impl AccountStore for DuckDbRepository {
    fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
        let mut accounts = self.query_accounts("WHERE account_id = ?", Some(&id.to_string()))?;
        Ok(accounts.pop())
    }

    fn get_account_by_number(&self, account_number: &str) -> Result<Option<Account>> {
        let mut accounts =
            self.query_accounts("WHERE account_number = ?", Some(account_number))?;
        Ok(accounts.pop())
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        self.query_accounts("ORDER BY row_seq", None)
    }

    fn create_account(&self, account: &Account) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sys_bank_accounts (account_id, owner_name, account_number, bank,
                                            balance, password_hash, version, created_at, updated_at)
             VALUES (?, ?, ?, ?, CAST(? AS DECIMAL(18,2)), ?, ?, ?, ?)",
            params![
                account.id.to_string(),
                account.owner_name,
                account.account_number,
                account.bank,
                account.balance.to_string(),
                account.password_hash,
                account.version,
                account.created_at.to_rfc3339(),
                account.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| unique_violation(e, "Account number already registered"))?;
        Ok(())
    }

    fn update_account_details(
        &self,
        id: Uuid,
        owner_name: &str,
        account_number: &str,
    ) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let id = id.to_string();
        let now = Utc::now().to_rfc3339();

        let current: String = match tx.query_row(
            "SELECT account_number FROM sys_bank_accounts WHERE account_id = ?",
            [&id],
            |row| row.get(0),
        ) {
            Ok(number) => number,
            Err(duckdb::Error::QueryReturnedNoRows) => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        // DuckDB rechecks the unique index on any write to an indexed
        // column, so the number is only written when it actually changes
        let changed = if current != account_number {
            tx.execute(
                "UPDATE sys_bank_accounts
                 SET account_number = ?, owner_name = ?, updated_at = ?
                 WHERE account_id = ?",
                params![account_number, owner_name, now, id],
            )
            .map_err(|e| unique_violation(e, "Account number already registered"))?
        } else {
            tx.execute(
                "UPDATE sys_bank_accounts SET owner_name = ?, updated_at = ? WHERE account_id = ?",
                params![owner_name, now, id],
            )?
        };

        tx.commit()?;
        Ok(changed > 0)
    }

    fn update_account_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE sys_bank_accounts SET password_hash = ?, updated_at = ? WHERE account_id = ?",
            params![password_hash, Utc::now().to_rfc3339(), id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn delete_account(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM sys_bank_accounts WHERE account_id = ?",
            [id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn conditional_update_balance(&self, write: BalanceWrite) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            BALANCE_UPDATE_SQL,
            params![
                write.new_balance.to_string(),
                Utc::now().to_rfc3339(),
                write.id.to_string(),
                write.expected_version,
            ],
        )?;
        Ok(changed > 0)
    }

    fn transfer_balance(&self, source: BalanceWrite, target: BalanceWrite) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();

        for write in [source, target] {
            let changed = tx.execute(
                BALANCE_UPDATE_SQL,
                params![
                    write.new_balance.to_string(),
                    now,
                    write.id.to_string(),
                    write.expected_version,
                ],
            )?;
            if changed == 0 {
                tx.rollback()?;
                return Ok(false);
            }
        }

        tx.commit()?;
        Ok(true)
    }
}

// === User operations ===

impl UserStore for DuckDbRepository {
    fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let mut users = self.query_users("WHERE user_id = ?", Some(&id.to_string()))?;
        Ok(users.pop())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut users = self.query_users("WHERE email = ?", Some(&User::normalize_email(email)))?;
        Ok(users.pop())
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.query_users("ORDER BY row_seq", None)
    }

    fn create_user(&self, user: &User) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sys_users (user_id, name, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| unique_violation(e, "Email already registered"))?;
        Ok(())
    }

    fn update_user_details(&self, id: Uuid, name: &str, email: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let id = id.to_string();
        let email = User::normalize_email(email);
        let now = Utc::now().to_rfc3339();

        let current: String = match tx.query_row(
            "SELECT email FROM sys_users WHERE user_id = ?",
            [&id],
            |row| row.get(0),
        ) {
            Ok(email) => email,
            Err(duckdb::Error::QueryReturnedNoRows) => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let changed = if current != email {
            tx.execute(
                "UPDATE sys_users SET email = ?, name = ?, updated_at = ? WHERE user_id = ?",
                params![email, name, now, id],
            )
            .map_err(|e| unique_violation(e, "Email already registered"))?
        } else {
            tx.execute(
                "UPDATE sys_users SET name = ?, updated_at = ? WHERE user_id = ?",
                params![name, now, id],
            )?
        };

        tx.commit()?;
        Ok(changed > 0)
    }

    fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE user_id = ?",
            params![password_hash, Utc::now().to_rfc3339(), id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn delete_user(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM sys_users WHERE user_id = ?", [id.to_string()])?;
        Ok(changed > 0)
    }
}

// === Row mapping ===

/// Raw column values, converted to domain types outside the row callback
struct AccountRow {
    id: String,
    owner_name: String,
    account_number: String,
    bank: String,
    balance: String,
    password_hash: String,
    version: i64,
    created_at: String,
    updated_at: String,
}

impl AccountRow {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_name: row.get(1)?,
            account_number: row.get(2)?,
            bank: row.get(3)?,
            balance: row.get(4)?,
            password_hash: row.get(5)?,
            version: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_account(self) -> Result<Account> {
        Ok(Account {
            id: parse_uuid(&self.id)?,
            owner_name: self.owner_name,
            account_number: self.account_number,
            bank: self.bank,
            balance: Decimal::from_str(&self.balance)
                .map_err(|e| Error::database(format!("bad balance '{}': {e}", self.balance)))?,
            password_hash: self.password_hash,
            version: self.version,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_user(self) -> Result<User> {
        Ok(User {
            id: parse_uuid(&self.id)?,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::database(format!("bad id '{s}': {e}")))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::database(format!("bad timestamp '{s}': {e}")))
}

/// Turn unique-index violations into `Duplicate`, anything else into `Database`
fn unique_violation(err: duckdb::Error, message: &str) -> Error {
    let text = err.to_string();
    let lower = text.to_lowercase();
    if lower.contains("duplicate key") || lower.contains("unique constraint") {
        Error::duplicate(message)
    } else {
        Error::database(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> DuckDbRepository {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        repo
    }

    fn account(number: &str, balance: i64) -> Account {
        Account::new("alice", number, "abc", Decimal::new(balance, 0), "hash")
    }

    #[test]
    fn test_account_round_trip() {
        let repo = repo();
        let acc = account("123456789", 100);
        repo.create_account(&acc).unwrap();

        let loaded = repo.get_account(acc.id).unwrap().unwrap();
        assert_eq!(loaded.owner_name, "ALICE");
        assert_eq!(loaded.balance, Decimal::new(100, 0));
        assert_eq!(loaded.password_hash, "hash");
        assert_eq!(loaded.version, 0);

        let by_number = repo.get_account_by_number("123456789").unwrap().unwrap();
        assert_eq!(by_number.id, acc.id);
        assert!(repo.get_account_by_number("000000000").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_account_number() {
        let repo = repo();
        repo.create_account(&account("123456789", 1)).unwrap();
        let err = repo.create_account(&account("123456789", 1)).unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
        assert_eq!(repo.list_accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_conditional_update_balance() {
        let repo = repo();
        let acc = account("123456789", 100);
        repo.create_account(&acc).unwrap();

        let write = BalanceWrite {
            id: acc.id,
            expected_version: 0,
            new_balance: Decimal::new(15050, 2),
        };
        assert!(repo.conditional_update_balance(write).unwrap());
        // Same expected version again is stale now
        assert!(!repo.conditional_update_balance(write).unwrap());

        let loaded = repo.get_account(acc.id).unwrap().unwrap();
        assert_eq!(loaded.balance, Decimal::new(15050, 2));
        assert_eq!(loaded.version, 1);
    }

    #[test]
    fn test_transfer_rolls_back_on_stale_target() {
        let repo = repo();
        let a = account("111111111", 100);
        let b = account("222222222", 0);
        repo.create_account(&a).unwrap();
        repo.create_account(&b).unwrap();

        let source = BalanceWrite {
            id: a.id,
            expected_version: 0,
            new_balance: Decimal::new(40, 0),
        };
        let stale_target = BalanceWrite {
            id: b.id,
            expected_version: 7,
            new_balance: Decimal::new(60, 0),
        };
        assert!(!repo.transfer_balance(source, stale_target).unwrap());
        assert_eq!(repo.get_account(a.id).unwrap().unwrap().balance, Decimal::new(100, 0));

        let target = BalanceWrite {
            expected_version: 0,
            ..stale_target
        };
        assert!(repo.transfer_balance(source, target).unwrap());
        assert_eq!(repo.get_account(a.id).unwrap().unwrap().balance, Decimal::new(40, 0));
        assert_eq!(repo.get_account(b.id).unwrap().unwrap().balance, Decimal::new(60, 0));
    }

    #[test]
    fn test_update_details_keeps_number_when_unchanged() {
        let repo = repo();
        let acc = account("123456789", 1);
        repo.create_account(&acc).unwrap();

        assert!(repo.update_account_details(acc.id, "BOB", "123456789").unwrap());
        assert!(repo.update_account_details(acc.id, "BOB", "987654321").unwrap());
        let loaded = repo.get_account(acc.id).unwrap().unwrap();
        assert_eq!(loaded.owner_name, "BOB");
        assert_eq!(loaded.account_number, "987654321");

        assert!(!repo.update_account_details(Uuid::new_v4(), "X", "123456789").unwrap());
    }

    #[test]
    fn test_update_details_duplicate_writes_nothing() {
        let repo = repo();
        repo.create_account(&account("111111111", 1)).unwrap();
        let other = account("222222222", 1);
        repo.create_account(&other).unwrap();

        let err = repo
            .update_account_details(other.id, "CAROL", "111111111")
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
        let loaded = repo.get_account(other.id).unwrap().unwrap();
        assert_eq!(loaded.owner_name, "ALICE");
        assert_eq!(loaded.account_number, "222222222");

        repo.create_user(&User::new("Ops", "ops@bank.example", "hash")).unwrap();
        let user = User::new("Dev", "dev@bank.example", "hash");
        repo.create_user(&user).unwrap();
        let err = repo
            .update_user_details(user.id, "Renamed", "ops@bank.example")
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
        assert_eq!(repo.get_user(user.id).unwrap().unwrap().name, "Dev");
    }

    #[test]
    fn test_update_details_surfaces_database_errors() {
        let repo = repo();
        let acc = account("123456789", 1);
        repo.create_account(&acc).unwrap();
        let user = User::new("Ops", "ops@bank.example", "hash");
        repo.create_user(&user).unwrap();

        {
            let conn = repo.conn().unwrap();
            conn.execute_batch("DROP TABLE sys_bank_accounts; DROP TABLE sys_users;")
                .unwrap();
        }

        assert!(matches!(
            repo.update_account_details(acc.id, "BOB", "123456789"),
            Err(Error::Database(_))
        ));
        assert!(matches!(
            repo.update_user_details(user.id, "Ops", "ops@bank.example"),
            Err(Error::Database(_))
        ));
    }

    #[test]
    fn test_users() {
        let repo = repo();
        let user = User::new("Ops", "ops@bank.example", "hash");
        repo.create_user(&user).unwrap();

        let loaded = repo.get_user_by_email("OPS@bank.example").unwrap().unwrap();
        assert_eq!(loaded.id, user.id);

        let dup = User::new("Other", "ops@bank.example", "hash");
        assert!(matches!(repo.create_user(&dup), Err(Error::Duplicate(_))));

        assert!(repo.delete_user(user.id).unwrap());
        assert!(!repo.delete_user(user.id).unwrap());
        assert!(repo.list_users().unwrap().is_empty());
    }
}
