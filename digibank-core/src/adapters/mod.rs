//! Adapter implementations
//!
//! - DuckDB for the account and user stores
//! - Argon2id for password hashing
//! - A mutex-guarded map for the login throttle

pub mod argon2;
pub mod duckdb;
pub mod memory;
