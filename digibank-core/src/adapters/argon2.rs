//! Argon2id password hashing adapter

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};

use crate::config::HashingConfig;
use crate::domain::result::{Error, Result};
use crate::ports::PasswordHasher;

/// Hashes into PHC strings (`$argon2id$v=19$...`)
pub struct Argon2Hasher {
    argon: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new(config: &HashingConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|e| Error::Config(format!("invalid argon2 parameters: {e}")))?;

        Ok(Self {
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::operation_failed(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        // Stored parameters in the PHC string win over ours
        let Ok(parsed) = PasswordHash::new(hash) else {
            return Ok(false);
        };
        Ok(self
            .argon
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new(&HashingConfig::fast()).unwrap();
        let hash = hasher.hash("Secr3t!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Secr3t!", &hash).unwrap());
        assert!(!hasher.verify("secr3t!", &hash).unwrap());
    }

    #[test]
    fn test_salted() {
        let hasher = Argon2Hasher::new(&HashingConfig::fast()).unwrap();
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        let hasher = Argon2Hasher::new(&HashingConfig::fast()).unwrap();
        assert!(!hasher.verify("anything", "not-a-phc-string").unwrap());
    }

    #[test]
    fn test_rejects_bad_params() {
        let config = HashingConfig {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 0,
        };
        assert!(Argon2Hasher::new(&config).is_err());
    }
}
