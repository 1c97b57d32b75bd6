//! Password hashing and verification using Argon2id
//!
//! Hashes are stored as PHC strings, so the parameters used to create a hash
//! travel with it and verification does not depend on the current settings.
//!
//! ```rust
//! use workshops::auth::password::{hash_password, verify_password};
//!
//! # fn example() -> anyhow::Result<()> {
//! let hash = hash_password("racheliscool")?;
//! assert!(verify_password("racheliscool", &hash)?);
//! assert!(!verify_password("rachelisnotcool", &hash)?);
//! # Ok(())
//! # }
//! ```

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Invalid parameters for Argon2
    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),
}

/// Argon2id cost parameters
///
/// Defaults follow the OWASP minimums: 19 MiB of memory, two iterations and
/// one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordHasher {
    /// Hasher with explicit costs
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::InvalidParams`] if Argon2 rejects the costs.
    pub fn new(memory_cost: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let hasher = Self {
            memory_cost,
            iterations,
            parallelism,
        };
        hasher.params()?;
        Ok(hasher)
    }

    fn params(&self) -> Result<Params, PasswordError> {
        Params::new(self.memory_cost, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))
    }

    /// Hash `password` with a fresh random salt
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params()?);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check `password` against a stored PHC hash in constant time
    ///
    /// # Errors
    ///
    /// Returns an error if `hash` cannot be parsed or verification itself
    /// fails. A wrong password is `Ok(false)`.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

/// Hash a password with the default parameters
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    PasswordHasher::default().hash(password)
}

/// Verify a password against a stored hash
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    PasswordHasher::default().verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("racheliscool").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("racheliscool", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_cheap_hash_verifies_with_defaults() {
        let hasher = PasswordHasher::new(8 * 1024, 1, 1).unwrap();
        let hash = hasher.hash("pw").unwrap();
        assert!(verify_password("pw", &hash).unwrap());
    }

    #[test]
    fn test_invalid_params() {
        assert!(matches!(
            PasswordHasher::new(1, 0, 1),
            Err(PasswordError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("pw", "not-a-phc-string"),
            Err(PasswordError::InvalidHash(_))
        ));
    }
}
