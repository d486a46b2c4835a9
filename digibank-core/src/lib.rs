//! Digibank Core - business logic for the digital bank backend
//!
//! Hexagonal layout:
//!
//! - **domain**: entities, validation rules, listing query model
//! - **ports**: traits for storage, password hashing and the login throttle
//! - **services**: accounts, users, authentication, listing, status, seeding
//! - **adapters**: DuckDB, Argon2id, in-memory throttle store

pub mod adapters;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod ports;
pub mod services;

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use fs2::FileExt;

use adapters::argon2::Argon2Hasher;
use adapters::duckdb::DuckDbRepository;
use adapters::memory::InMemoryThrottleStore;
use config::Config;
use services::*;

pub use domain::result::{Error, ErrorKind};
pub use domain::{Account, ListQuery, Page, User};

pub const DB_FILE: &str = "digibank.duckdb";
pub const LOCK_FILE: &str = "digibank.lock";

/// Main context: configuration, storage and every service, wired once
pub struct DigibankContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub account_service: AccountService,
    pub user_service: UserService,
    pub auth_service: AuthService,
    pub status_service: StatusService,
    pub seed_service: SeedService,
    _lock: Option<File>,
}

impl DigibankContext {
    /// Open the database in `data_dir`, holding an exclusive lock on it
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        let config = Config::load(data_dir)?;

        let lock_path = data_dir.join(LOCK_FILE);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("opening {}", lock_path.display()))?;
        lock.try_lock_exclusive().with_context(|| {
            format!(
                "data directory {} is in use by another digibank process",
                data_dir.display()
            )
        })?;

        let repository = DuckDbRepository::new(&data_dir.join(DB_FILE))
            .context("opening database")?;
        Self::assemble(config, repository, Some(lock))
    }

    /// Context over a private in-memory database
    pub fn in_memory(config: Config) -> Result<Self> {
        let repository = DuckDbRepository::open_in_memory()?;
        Self::assemble(config, repository, None)
    }

    fn assemble(config: Config, repository: DuckDbRepository, lock: Option<File>) -> Result<Self> {
        repository.ensure_schema().context("running migrations")?;
        let repository = Arc::new(repository);
        let hasher = Arc::new(Argon2Hasher::new(&config.hashing)?);
        let throttle = LoginThrottle::new(Arc::new(InMemoryThrottleStore::new()));

        let account_service = AccountService::new(repository.clone(), hasher.clone());
        let user_service = UserService::new(repository.clone(), hasher.clone());
        let auth_service = AuthService::new(repository.clone(), hasher.clone(), throttle);
        let status_service = StatusService::new(repository.clone(), repository.clone());
        let seed_service = SeedService::new(repository.clone(), repository.clone(), hasher);

        Ok(Self {
            config,
            repository,
            account_service,
            user_service,
            auth_service,
            status_service,
            seed_service,
            _lock: lock,
        })
    }
}
