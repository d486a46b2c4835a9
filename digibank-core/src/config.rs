//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "server": { "host": "127.0.0.1", "port": 5000 },
//!   "auth": { "jwtSecret": "...", "tokenTtlMinutes": 60 },
//!   "hashing": { "memoryCost": 19456, "timeCost": 2, "parallelism": 1 },
//!   "listing": { "defaultPageSize": 15 }
//! }
//! ```
//! Keys this crate does not know about are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::domain::query::DEFAULT_PAGE_SIZE;

pub const SETTINGS_FILE: &str = "settings.json";

pub const ENV_DIR: &str = "DIGIBANK_DIR";
pub const ENV_HOST: &str = "DIGIBANK_HOST";
pub const ENV_PORT: &str = "DIGIBANK_PORT";
pub const ENV_JWT_SECRET: &str = "DIGIBANK_JWT_SECRET";

/// Data directory: `$DIGIBANK_DIR`, else `~/.digibank`
pub fn data_dir(home: Option<PathBuf>) -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_DIR) {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    home.map(|h| h.join(".digibank"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_minutes: 60,
        }
    }
}

/// Argon2id cost parameters for password hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HashingConfig {
    /// KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_cost: argon2::Params::DEFAULT_M_COST,
            time_cost: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    /// Minimum costs argon2 accepts; only for tests
    pub fn fast() -> Self {
        Self {
            memory_cost: argon2::Params::MIN_M_COST,
            time_cost: argon2::Params::MIN_T_COST,
            parallelism: argon2::Params::MIN_P_COST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingConfig {
    pub default_page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    auth: AuthConfig,
    #[serde(default)]
    hashing: HashingConfig,
    #[serde(default)]
    listing: ListingConfig,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Digibank configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub hashing: HashingConfig,
    pub listing: ListingConfig,
    other: HashMap<String, serde_json::Value>,
}

impl Config {
    /// Load settings.json (defaults if missing) and apply env overrides
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("reading {}", settings_path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", settings_path.display()))?
        } else {
            SettingsFile::default()
        };

        let mut config = Self {
            server: raw.server,
            auth: raw.auth,
            hashing: raw.hashing,
            listing: raw.listing,
            other: raw.other,
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `DIGIBANK_*` overrides from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} must be a port number, got '{port}'"))?;
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET).filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = Some(secret);
        }
        Ok(())
    }

    pub fn with_hashing(mut self, hashing: HashingConfig) -> Self {
        self.hashing = hashing;
        self
    }

    /// Write settings.json, keeping unknown keys
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings = SettingsFile {
            server: self.server.clone(),
            auth: self.auth.clone(),
            hashing: self.hashing,
            listing: self.listing.clone(),
            other: self.other.clone(),
        };
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Configured JWT secret, or a random per-process one
    ///
    /// Tokens signed with a generated secret stop verifying after a restart.
    pub fn jwt_secret(&self) -> String {
        match &self.auth.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!(
                    "no auth.jwtSecret configured; using a random secret for this process"
                );
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                base64::engine::general_purpose::STANDARD.encode(bytes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let mut config = Config::default();
        config.apply_overrides(|_| None).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert_eq!(config.hashing.memory_cost, 19456);
        assert_eq!(config.listing.default_page_size, 15);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(|key| match key {
                ENV_HOST => Some("0.0.0.0".to_string()),
                ENV_PORT => Some("8080".to_string()),
                ENV_JWT_SECRET => Some("s3cret".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.jwt_secret(), "s3cret");

        let bad = config.apply_overrides(|key| (key == ENV_PORT).then(|| "http".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"server":{"port":6000},"theme":"dark"}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        config.listing.default_page_size = 50;
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["listing"]["defaultPageSize"], 50);
    }

    #[test]
    fn test_generated_secret_is_random() {
        let config = Config::default();
        assert_ne!(config.jwt_secret(), config.jwt_secret());
    }
}
