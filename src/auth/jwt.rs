//! JWT key material shared by the issuer and the validator

use crate::{config::AppConfig, error::AppError};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use secrecy::ExposeSecret;
use serde::Serialize;

/// The only algorithm tokens are signed with and accepted under
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Minimum secret length for HS256
pub const MIN_SECRET_LEN: usize = 32;

/// Process-wide signing secret, built once at startup and read-only afterwards
#[derive(Clone)]
pub struct SigningSecret {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningSecret {
    /// Build keys from raw secret bytes
    pub fn new(secret: &[u8]) -> Result<Self, AppError> {
        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    /// Build keys from the security section of the config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(config.security.jwt_secret.expose_secret().as_bytes())
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

/// Token pair response
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64, // seconds until access token expires
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_too_short() {
        assert!(matches!(
            SigningSecret::new(b"short"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SigningSecret::new(b"test_secret_key_32_characters_long!").unwrap();
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("test_secret"));
    }
}
