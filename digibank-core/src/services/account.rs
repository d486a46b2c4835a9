//! Account service - account CRUD and balance mutations
//!
//! Balance writes are read/compute/compare-and-swap on the account version,
//! retried a bounded number of times when another writer gets in between.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{validation, Account, AccountSummary, BalanceView, ListQuery, Page};
use crate::ports::{AccountStore, BalanceWrite, PasswordHasher};
use crate::services::listing;

/// Attempts per balance mutation before giving up with `OperationFailed`
pub const MAX_BALANCE_RETRIES: usize = 5;

const NOT_FOUND: &str = "Bank Account not found";
const WRONG_PASSWORD: &str = "Wrong password";
const NUMBER_TAKEN: &str = "Account Number is already registered";

// === Requests ===

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    pub bank: String,
    pub deposit: Option<Decimal>,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountUpdate {
    pub name: String,
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    pub password: String,
}

/// Password change request, shared with the user service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordChange {
    pub password_old: String,
    pub password_new: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub bank: String,
    pub amount: Option<Decimal>,
    pub title: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Transfer {
    pub bank: String,
    pub amount: Option<Decimal>,
    pub password: String,
}

// === Results ===

#[derive(Debug, Clone, Serialize)]
pub struct BalanceChange {
    pub id: String,
    pub owner_name: String,
    pub amount: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub id: String,
    pub bank: String,
    pub title: String,
    pub amount: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub id: String,
    pub target_id: String,
    /// Owner of the receiving account
    pub owner_name: String,
    pub bank: String,
    pub amount: Decimal,
    pub balance: Decimal,
}

pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    // === Queries ===

    pub fn get(&self, id: Uuid) -> Result<Account> {
        self.store
            .get_account(id)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    pub fn list(&self, query: &ListQuery) -> Result<Page<AccountSummary>> {
        let accounts = self.store.list_accounts()?;
        Ok(listing::query(accounts, query).map(|a| AccountSummary::from(&a)))
    }

    /// Balance lookup by account number
    pub fn balance(&self, account_number: &str) -> Result<BalanceView> {
        let account = self
            .store
            .get_account_by_number(account_number.trim())?
            .ok_or_else(|| Error::not_found("Account Number not found"))?;
        Ok(BalanceView::from(&account))
    }

    pub fn account_number_is_registered(&self, account_number: &str) -> Result<bool> {
        Ok(self.store.get_account_by_number(account_number)?.is_some())
    }

    /// False for a wrong password or an unknown account
    pub fn check_password(&self, id: Uuid, password: &str) -> Result<bool> {
        match self.store.get_account(id)? {
            Some(account) => self.hasher.verify(password, &account.password_hash),
            None => Ok(false),
        }
    }

    // === CRUD ===

    pub fn create(&self, request: &NewAccount) -> Result<Account> {
        let name = validation::owner_name(&request.name)?;
        let account_number = validation::account_number(&request.account_number)?;
        let bank = validation::bank(&request.bank)?;
        let deposit = validation::amount(
            request
                .deposit
                .ok_or_else(|| Error::validation("Deposit is required"))?
                .round_dp(2),
            "Deposit",
        )?;
        validation::new_password(&request.password, &request.password_confirm, "Password")?;

        if self.account_number_is_registered(&account_number)? {
            return Err(Error::duplicate(NUMBER_TAKEN));
        }

        let hash = self.hasher.hash(&request.password)?;
        let account = Account::new(name, account_number, bank, deposit, hash);
        self.store.create_account(&account)?;

        tracing::info!(
            account_id = %account.id,
            account_number = %account.account_number,
            "bank account created"
        );
        Ok(account)
    }

    /// Change owner name and account number; requires the account password
    pub fn update(&self, id: Uuid, request: &AccountUpdate) -> Result<Account> {
        let name = validation::owner_name(&request.name)?;
        let account_number = validation::account_number(&request.account_number)?;
        validation::password_present(&request.password, "Password")?;

        let account = self.get(id)?;
        self.verify(&account, &request.password)?;

        if let Some(other) = self.store.get_account_by_number(&account_number)? {
            if other.id != id {
                return Err(Error::duplicate(NUMBER_TAKEN));
            }
        }

        if !self.store.update_account_details(id, &name, &account_number)? {
            return Err(Error::operation_failed("Failed to update Bank Account"));
        }
        tracing::info!(account_id = %id, "bank account updated");
        self.get(id)
    }

    /// Delete an account; returns the record as it was
    pub fn delete(&self, id: Uuid, password: &str) -> Result<Account> {
        validation::password_present(password, "Password")?;
        let account = self.get(id)?;
        self.verify(&account, password)?;

        if !self.store.delete_account(id)? {
            return Err(Error::operation_failed("Failed to delete Bank Account"));
        }
        tracing::info!(account_id = %id, "bank account deleted");
        Ok(account)
    }

    pub fn change_password(&self, id: Uuid, request: &PasswordChange) -> Result<()> {
        validation::password_present(&request.password_old, "Old password")?;
        validation::new_password(
            &request.password_new,
            &request.password_confirm,
            "New password",
        )?;

        let account = self.get(id)?;
        self.verify(&account, &request.password_old)?;

        let hash = self.hasher.hash(&request.password_new)?;
        if !self.store.update_account_password(id, &hash)? {
            return Err(Error::operation_failed("Failed to change password"));
        }
        tracing::info!(account_id = %id, "bank account password changed");
        Ok(())
    }

    // === Balances ===

    pub fn deposit(&self, id: Uuid, amount: Option<Decimal>) -> Result<BalanceChange> {
        let amount = required_amount(amount, "Deposit Amount")?;

        for attempt in 1..=MAX_BALANCE_RETRIES {
            let account = self.get(id)?;
            let new_balance = account.credited(amount)?;
            if self.store.conditional_update_balance(BalanceWrite {
                id,
                expected_version: account.version,
                new_balance,
            })? {
                tracing::info!(account_id = %id, %amount, "deposit");
                return Ok(BalanceChange {
                    id: id.to_string(),
                    owner_name: account.owner_name,
                    amount,
                    balance: new_balance,
                });
            }
            tracing::debug!(account_id = %id, attempt, "deposit lost version race, retrying");
        }
        Err(Error::operation_failed("Failed to deposit"))
    }

    /// Payment to an external payee; order of checks: account, password, funds
    pub fn payment(&self, id: Uuid, request: &Payment) -> Result<PaymentReceipt> {
        let bank = validation::bank(&request.bank)?;
        let amount = required_amount(request.amount, "Deposit Amount")?;
        let title = validation::title(&request.title)?;
        validation::password_present(&request.password, "Password")?;

        let account = self.get(id)?;
        self.verify(&account, &request.password)?;

        let mut account = account;
        for attempt in 1..=MAX_BALANCE_RETRIES {
            if attempt > 1 {
                account = self.get(id)?;
            }
            let new_balance = account.debited(amount)?;
            if self.store.conditional_update_balance(BalanceWrite {
                id,
                expected_version: account.version,
                new_balance,
            })? {
                tracing::info!(account_id = %id, %amount, bank = %bank, "payment");
                return Ok(PaymentReceipt {
                    id: id.to_string(),
                    bank,
                    title,
                    amount,
                    balance: new_balance,
                });
            }
            tracing::debug!(account_id = %id, attempt, "payment lost version race, retrying");
        }
        Err(Error::operation_failed("Failed to payment"))
    }

    /// Move `amount` from `source_id` to `target_id` in one store transaction
    pub fn transfer(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        request: &Transfer,
    ) -> Result<TransferReceipt> {
        let bank = validation::bank(&request.bank)?;
        let amount = required_amount(request.amount, "Transfer Amount")?;
        validation::password_present(&request.password, "Password")?;
        if source_id == target_id {
            return Err(Error::validation("Cannot transfer to the same account"));
        }

        let source = self.get(source_id)?;
        self.get(target_id)?;
        self.verify(&source, &request.password)?;

        for attempt in 1..=MAX_BALANCE_RETRIES {
            let source = self.get(source_id)?;
            let target = self.get(target_id)?;
            let source_balance = source.debited(amount)?;
            let target_balance = target.credited(amount)?;

            let committed = self.store.transfer_balance(
                BalanceWrite {
                    id: source_id,
                    expected_version: source.version,
                    new_balance: source_balance,
                },
                BalanceWrite {
                    id: target_id,
                    expected_version: target.version,
                    new_balance: target_balance,
                },
            )?;
            if committed {
                tracing::info!(
                    source = %source_id,
                    target = %target_id,
                    %amount,
                    "transfer committed"
                );
                return Ok(TransferReceipt {
                    id: source_id.to_string(),
                    target_id: target_id.to_string(),
                    owner_name: target.owner_name,
                    bank,
                    amount,
                    balance: source_balance,
                });
            }
            tracing::debug!(source = %source_id, attempt, "transfer lost version race, retrying");
        }
        Err(Error::operation_failed("Failed to transfer balance"))
    }

    fn verify(&self, account: &Account, password: &str) -> Result<()> {
        if self.hasher.verify(password, &account.password_hash)? {
            Ok(())
        } else {
            Err(Error::invalid_credentials(WRONG_PASSWORD))
        }
    }
}

fn required_amount(amount: Option<Decimal>, label: &str) -> Result<Decimal> {
    let amount = amount.ok_or_else(|| Error::validation(format!("{label} is required")))?;
    validation::amount(amount.round_dp(2), label)
}
