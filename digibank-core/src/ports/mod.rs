//! Port definitions (hexagonal architecture)
//!
//! The services depend only on these traits. Adapters provide the
//! concrete DuckDB, Argon2 and in-memory implementations.

mod password;
mod repository;
mod throttle;

pub use password::PasswordHasher;
pub use repository::{AccountStore, BalanceWrite, UserStore};
pub use throttle::ThrottleStore;
