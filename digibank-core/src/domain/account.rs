//! Bank account domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::query::{FieldValue, Listable};
use super::result::{Error, Result};

/// Exclusive upper bound for balances and amounts (`DECIMAL(18,2)` holds 16 integer digits)
pub fn balance_limit() -> Decimal {
    Decimal::new(10_000_000_000_000_000, 0)
}

/// A bank account with a balance and a password guarding its mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub owner_name: String,
    /// Nine ASCII digits, unique across all accounts
    pub account_number: String,
    pub bank: String,
    pub balance: Decimal,
    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Bumped on every balance write; used for compare-and-swap updates
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a fresh id
    ///
    /// Owner name and bank are normalized to uppercase.
    pub fn new(
        owner_name: impl AsRef<str>,
        account_number: impl Into<String>,
        bank: impl AsRef<str>,
        balance: Decimal,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_name: Self::normalize_text(owner_name.as_ref()),
            account_number: account_number.into(),
            bank: Self::normalize_text(bank.as_ref()),
            balance,
            password_hash: password_hash.into(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Uppercase and trim free-text fields (owner name, bank)
    pub fn normalize_text(value: &str) -> String {
        value.trim().to_uppercase()
    }

    /// Balance after crediting `amount`, refusing to leave the storable range
    pub fn credited(&self, amount: Decimal) -> Result<Decimal> {
        self.balance
            .checked_add(amount)
            .filter(|balance| *balance < balance_limit())
            .ok_or_else(|| Error::validation("Balance would exceed the maximum allowed"))
    }

    /// Balance after debiting `amount`, refusing to go below zero
    pub fn debited(&self, amount: Decimal) -> Result<Decimal> {
        if self.balance < amount {
            return Err(Error::insufficient_funds("Balance not enough"));
        }
        Ok(self.balance - amount)
    }
}

impl Listable for Account {
    const SEARCHABLE: &'static [&'static str] = &["ownerName"];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "ownerName" => Some(FieldValue::Text(&self.owner_name)),
            "accountNumber" => Some(FieldValue::Text(&self.account_number)),
            "bank" => Some(FieldValue::Text(&self.bank)),
            "balance" => Some(FieldValue::Number(self.balance)),
            _ => None,
        }
    }
}

/// Public projection of an account used in listings
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub owner_name: String,
    pub account_number: String,
    pub balance: Decimal,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            owner_name: account.owner_name.clone(),
            account_number: account.account_number.clone(),
            balance: account.balance,
        }
    }
}

/// Balance lookup result (by account number)
#[derive(Debug, Clone, Serialize)]
pub struct BalanceView {
    pub id: String,
    pub owner_name: String,
    pub balance: Decimal,
}

impl From<&Account> for BalanceView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            owner_name: account.owner_name.clone(),
            balance: account.balance,
        }
    }
}
