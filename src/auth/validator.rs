//! Token verification: structure, signature, then expiry

use super::{
    claims::Claims,
    clock::Clock,
    jwt::{SigningSecret, TOKEN_ALGORITHM},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Why a presented token was refused
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has expired")]
    Expired,
}

/// Verifies tokens produced by [`super::issuer::TokenIssuer`].
///
/// The payload is never decoded before the signature has been checked.
/// Expiry is compared against the injected clock, read once per call.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    pub fn new(secret: &SigningSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // exp is checked below against the injected clock
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            decoding_key: secret.decoding_key().clone(),
            validation,
            clock,
        }
    }

    /// Validate a token and recover its claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let alg = header_algorithm(token)?;
        if alg.parse::<Algorithm>().ok() != Some(TOKEN_ALGORITHM) {
            tracing::debug!(alg = %alg, "Rejected token with unexpected algorithm");
            return Err(TokenError::BadSignature);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                classify(e.kind())
            })?
            .claims;

        let now = self.clock.now();
        if claims.exp < now {
            tracing::debug!(exp = claims.exp, now, "Token expired");
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Split the compact form and read `alg` from the header.
///
/// Only the header is decoded here. Payload and signature are left to
/// `decode`, which verifies the signature before touching the payload, so any
/// corruption in either segment surfaces as a signature failure.
fn header_algorithm(token: &str) -> Result<String, TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    if [header, payload, signature].iter().any(|segment| segment.is_empty()) {
        return Err(TokenError::Malformed);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    header
        .get("alg")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or(TokenError::Malformed)
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
