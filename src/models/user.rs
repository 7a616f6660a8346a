//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{claims::Identity, jwt::TokenPair};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub password_hash: String,

    // Latest issued tokens, kept for the caller's bookkeeping only
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Identity attributes embedded in access tokens
    pub fn identity(&self) -> Identity {
        Identity {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            user_id: self.user_id.clone(),
        }
    }

    /// Record a freshly issued token pair
    pub fn set_tokens(&mut self, tokens: &TokenPair, now: DateTime<Utc>) {
        self.access_token = Some(tokens.access_token.clone());
        self.refresh_token = Some(tokens.refresh_token.clone());
        self.updated_at = now;
    }
}

/// User response (without sensitive data)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Paged user listing
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub total_count: usize,
    pub user_items: Vec<UserResponse>,
}

/// Paging query (`?recordPerPage=&page=`)
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
    pub page: Option<String>,
}

impl ListUsersQuery {
    pub const DEFAULT_RECORD_PER_PAGE: usize = 10;

    /// Resolve to (offset, limit); missing, invalid or < 1 values fall back to defaults
    pub fn offset_limit(&self) -> (usize, usize) {
        let limit = parse_positive(self.record_per_page.as_deref())
            .unwrap_or(Self::DEFAULT_RECORD_PER_PAGE);
        let page = parse_positive(self.page.as_deref()).unwrap_or(1);

        ((page - 1).saturating_mul(limit), limit)
    }
}

fn parse_positive(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v >= 1)
}
