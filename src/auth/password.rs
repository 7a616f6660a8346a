//! Password hashing and verification using Argon2id

use crate::error::AppError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::sync::OnceLock;

// Stand-in account password used when the looked-up account does not exist
const UNKNOWN_ACCOUNT_PASSWORD: &str = "unknown-account-placeholder";

/// Password hasher producing PHC-format Argon2id strings
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    unknown_account_hash: OnceLock<String>,
}

impl PasswordHasher {
    /// Create hasher with the crate defaults (Argon2id, v0x13, m=19MiB, t=2, p=1)
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            unknown_account_hash: OnceLock::new(),
        }
    }

    /// Hash a password
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a hash
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            tracing::debug!("Failed to parse password hash: {:?}", e);
            AppError::Internal(format!("Failed to parse password hash: {}", e))
        })?;

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Runs one verification against a placeholder hash so the rejection costs
    /// the same as a wrong password.
    pub fn reject_unknown_account(&self, password: &str) -> AppError {
        match self.unknown_account_hash() {
            Some(hash) => {
                let _ = self.verify(password, hash);
            }
            None => tracing::warn!("Placeholder password hash unavailable"),
        }

        AppError::Unauthorized
    }

    fn unknown_account_hash(&self) -> Option<&str> {
        if let Some(hash) = self.unknown_account_hash.get() {
            return Some(hash.as_str());
        }

        let hash = self.hash(UNKNOWN_ACCOUNT_PASSWORD).ok()?;
        Some(self.unknown_account_hash.get_or_init(|| hash).as_str())
    }

    /// Enforce the configured minimum length
    pub fn validate_password_policy(password: &str, min_length: usize) -> Result<(), AppError> {
        if password.chars().count() < min_length {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                min_length
            )));
        }

        Ok(())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
