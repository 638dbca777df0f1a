//! Credential Manager
//!
//! Argon2id password hashing. Hashes are PHC strings, so salt, algorithm
//! and cost parameters travel with the stored value and verification never
//! depends on the current configuration.

use crate::config::AccountsConfig;
use crate::error::AccountError;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

/// Hashes and verifies passwords
///
/// Holds only immutable cost parameters and is cheap to clone, so a single
/// instance is shared across all requests. The async methods move the work
/// onto tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct CredentialManager {
    params: Params,
}

impl CredentialManager {
    /// Create a manager with explicit Argon2 costs
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Result<Self, AccountError> {
        let params = Params::new(memory_cost, time_cost, parallelism, None)
            .map_err(|e| AccountError::Config(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    pub fn from_config(config: &AccountsConfig) -> Result<Self, AccountError> {
        Self::new(
            config.argon2_memory_cost,
            config.argon2_time_cost,
            config.argon2_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt, blocking the current thread
    pub fn hash_blocking(&self, plaintext: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)?
            .to_string();
        Ok(hash)
    }

    /// Check a password against a stored hash, blocking the current thread
    ///
    /// An unparseable stored hash is treated as a mismatch.
    pub fn verify_blocking(&self, plaintext: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Hash a password off the async worker threads
    pub async fn hash(&self, plaintext: &str) -> Result<String, AccountError> {
        let manager = self.clone();
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || manager.hash_blocking(&plaintext))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {}", e);
                AccountError::Hashing(e.to_string())
            })?
    }

    /// Verify a password off the async worker threads
    pub async fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        let manager = self.clone();
        let plaintext = plaintext.to_owned();
        let stored_hash = stored_hash.to_owned();

        match tokio::task::spawn_blocking(move || manager.verify_blocking(&plaintext, &stored_hash))
            .await
        {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!("Password verification task failed: {}", e);
                false
            }
        }
    }
}
