//! Core domain entities
//!
//! Plain data structures plus the rules that apply to them. No I/O.

mod account;
pub mod login;
pub mod query;
pub mod result;
mod user;
pub mod validation;

pub use account::{balance_limit, Account, AccountSummary, BalanceView};
pub use login::LoginAttempt;
pub use query::{FieldValue, ListQuery, Listable, Page, SearchFilter, SortDirection, SortSpec};
pub use user::{User, UserSummary};
