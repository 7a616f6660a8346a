//! Claim set carried inside every signed token

use serde::{Deserialize, Serialize};

/// Identity attributes handed to the issuer after credentials were checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_id: String,
}

/// JWT payload.
///
/// Access tokens carry every identity field; refresh tokens carry only `exp`.
/// Identity fields are therefore optional on the wire and callers that need
/// them must handle their absence explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Expiration (Unix timestamp, seconds)
    pub exp: i64,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl Claims {
    /// Claims for an access token
    pub fn access(identity: &Identity, exp: i64) -> Self {
        Self {
            email: Some(identity.email.clone()),
            first_name: Some(identity.first_name.clone()),
            last_name: Some(identity.last_name.clone()),
            user_id: Some(identity.user_id.clone()),
            exp,
            iss: None,
            sub: None,
        }
    }

    /// Claims for a refresh token
    pub fn refresh(exp: i64) -> Self {
        Self {
            email: None,
            first_name: None,
            last_name: None,
            user_id: None,
            exp,
            iss: None,
            sub: None,
        }
    }

    /// Whether the claim set identifies a user (email and user id present)
    pub fn has_identity(&self) -> bool {
        self.email.is_some() && self.user_id.is_some()
    }
}
