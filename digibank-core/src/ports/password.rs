use crate::domain::result::Result;

/// Opaque password hashing capability
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string
    fn hash(&self, password: &str) -> Result<String>;

    /// Check a plaintext password against a stored hash
    ///
    /// A malformed stored hash verifies as `false`.
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}
