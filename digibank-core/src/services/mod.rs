//! Service layer - business logic orchestration
//!
//! Services talk to the ports, never to each other (listing is a plain
//! function shared by the account and user services).

pub mod account;
mod auth;
pub mod listing;
pub mod migration;
pub mod seed;
mod status;
pub mod throttle;
pub mod user;

pub use account::{
    AccountService, AccountUpdate, BalanceChange, NewAccount, PasswordChange, Payment,
    PaymentReceipt, Transfer, TransferReceipt,
};
pub use auth::{AuthService, Credentials};
pub use migration::{MigrationResult, MigrationService};
pub use seed::{SeedOutcome, SeedService};
pub use status::{StatusService, StatusSummary};
pub use throttle::LoginThrottle;
pub use user::{NewUser, UserService, UserUpdate};
