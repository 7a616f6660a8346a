//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserResponse;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,
    #[validate(length(min = 2, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login / signup response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "chef@example.com".to_string(),
            password: "secret123".to_string(),
            phone: "555-0100".to_string(),
            avatar: None,
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn test_invalid_signup_fields() {
        let mut req = signup();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());

        let mut req = signup();
        req.first_name = "A".to_string();
        assert!(req.validate().is_err());

        let mut req = signup();
        req.password = "12345".to_string();
        assert!(req.validate().is_err());

        let mut req = signup();
        req.phone = String::new();
        assert!(req.validate().is_err());
    }
}
