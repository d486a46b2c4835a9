//! Status service - counts and totals for operators

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::ports::{AccountStore, UserStore};

pub struct StatusService {
    accounts: Arc<dyn AccountStore>,
    users: Arc<dyn UserStore>,
}

impl StatusService {
    pub fn new(accounts: Arc<dyn AccountStore>, users: Arc<dyn UserStore>) -> Self {
        Self { accounts, users }
    }

    pub fn get_status(&self) -> Result<StatusSummary> {
        let accounts = self.accounts.list_accounts()?;
        let total_users = self.users.list_users()?.len();

        let total_balance = accounts.iter().map(|a| a.balance).sum();
        let banks = {
            let mut banks: Vec<String> = accounts.iter().map(|a| a.bank.clone()).collect();
            banks.sort();
            banks.dedup();
            banks
        };

        Ok(StatusSummary {
            total_accounts: accounts.len(),
            total_users,
            total_balance,
            banks,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: usize,
    pub total_users: usize,
    pub total_balance: Decimal,
    /// Distinct bank codes, sorted
    pub banks: Vec<String>,
}
