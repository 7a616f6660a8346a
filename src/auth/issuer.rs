//! Access + refresh token issuance

use super::{
    claims::{Claims, Identity},
    clock::Clock,
    jwt::{SigningSecret, TokenPair, TOKEN_ALGORITHM},
};
use crate::{config::AppConfig, error::AppError};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

/// Default access token lifetime (24h)
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 24 * 60 * 60;

/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Signs access and refresh tokens.
///
/// Issuance is a pure function of the identity, the bound secret and TTLs,
/// and the clock reading; nothing is remembered about issued tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    access_token_exp_secs: u64,
    refresh_token_exp_secs: u64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(
        secret: &SigningSecret,
        access_token_exp_secs: u64,
        refresh_token_exp_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoding_key: secret.encoding_key().clone(),
            access_token_exp_secs,
            refresh_token_exp_secs,
            clock,
        }
    }

    /// Create issuer with the TTLs from config
    pub fn from_config(config: &AppConfig, secret: &SigningSecret, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            secret,
            config.security.access_token_exp_secs,
            config.security.refresh_token_exp_secs,
            clock,
        )
    }

    /// Generate access token
    pub fn generate_access_token(&self, identity: &Identity) -> Result<String, AppError> {
        self.access_token_at(identity, self.clock.now())
    }

    /// Generate refresh token
    pub fn generate_refresh_token(&self) -> Result<String, AppError> {
        self.refresh_token_at(self.clock.now())
    }

    /// Generate token pair; both expiries are computed from one clock reading
    pub fn issue(&self, identity: &Identity) -> Result<TokenPair, AppError> {
        let now = self.clock.now();
        let access_token = self.access_token_at(identity, now)?;
        let refresh_token = self.refresh_token_at(now)?;

        tracing::debug!(user_id = %identity.user_id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_token_exp_secs,
        })
    }

    fn access_token_at(&self, identity: &Identity, now: i64) -> Result<String, AppError> {
        let claims = Claims::access(identity, expiry(now, self.access_token_exp_secs));
        self.sign(&claims, "access")
    }

    fn refresh_token_at(&self, now: i64) -> Result<String, AppError> {
        let claims = Claims::refresh(expiry(now, self.refresh_token_exp_secs));
        self.sign(&claims, "refresh")
    }

    fn sign(&self, claims: &Claims, kind: &str) -> Result<String, AppError> {
        encode(&Header::new(TOKEN_ALGORITHM), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode {} token: {:?}", kind, e);
            AppError::Internal(format!("Failed to encode {} token", kind))
        })
    }
}

fn expiry(now: i64, ttl_secs: u64) -> i64 {
    now.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX))
}
