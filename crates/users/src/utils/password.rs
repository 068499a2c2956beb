//! Password hashing and verification utilities.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use youmeet_config::AuthConfig;

use crate::types::AuthError;

/// Argon2id hasher configured with the deployment's cost parameters.
#[derive(Debug, Clone)]
pub struct PasswordHasherConfig {
    params: Params,
}

impl PasswordHasherConfig {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|err| AuthError::Validation(format!("invalid password hash parameters: {err}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt into a PHC string.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::Persistence("password hashing failed".to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Check a password against a stored PHC string.
    ///
    /// The parameters embedded in the hash win over the configured ones, so
    /// hashes keep verifying after the cost is retuned.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`Self::hash_password`] on the blocking thread pool.
    pub async fn hash_password_blocking(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|err| AuthError::Persistence(format!("password hashing task failed: {err}")))?
    }

    /// [`Self::verify_password`] on the blocking thread pool. A failed task
    /// counts as a mismatch.
    pub async fn verify_password_blocking(&self, password: &str, hash: &str) -> bool {
        let hasher = self.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .unwrap_or(false)
    }
}
