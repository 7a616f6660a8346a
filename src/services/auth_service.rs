//! 认证服务：注册、登录

use crate::{
    auth::{issuer::TokenIssuer, password::PasswordHasher},
    error::AppError,
    models::{auth::*, user::*},
    repository::user_repo::UserStore,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct AuthService {
    store: Arc<dyn UserStore>,
    issuer: Arc<TokenIssuer>,
    hasher: PasswordHasher,
    password_min_length: usize,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, issuer: Arc<TokenIssuer>, password_min_length: usize) -> Self {
        Self {
            store,
            issuer,
            hasher: PasswordHasher::new(),
            password_min_length,
        }
    }

    /// 用户注册
    pub async fn signup(&self, req: SignupRequest) -> Result<AuthResponse, AppError> {
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, self.password_min_length)?;

        // email 和 phone 都必须唯一
        if self
            .store
            .exists_with_email_or_phone(&req.email, &req.phone)
            .await?
        {
            return Err(AppError::BadRequest(
                "this email or phone number already exists".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&req.password)?;
        let now = Utc::now();
        let mut user = User {
            user_id: Uuid::new_v4().to_string(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            avatar: req.avatar,
            password_hash,
            access_token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };

        let tokens = self.issuer.issue(&user.identity())?;
        user.set_tokens(&tokens, now);

        self.store.insert(user.clone()).await?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user: UserResponse::from(user),
        })
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let Some(mut user) = self.store.find_by_email(&req.email).await? else {
            // 未知账号同样执行一次哈希校验，避免通过响应时间探测已注册邮箱
            return Err(self.hasher.reject_unknown_account(&req.password));
        };

        // 验证密码
        if let Err(e) = self.hasher.verify(&req.password, &user.password_hash) {
            tracing::info!(user_id = %user.user_id, "Login rejected");
            return Err(e);
        }

        let tokens = self.issuer.issue(&user.identity())?;
        self.store.update_tokens(&user.user_id, &tokens).await?;
        user.set_tokens(&tokens, Utc::now());

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user: UserResponse::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{clock::FixedClock, jwt::SigningSecret};
    use crate::repository::user_repo::InMemoryUserStore;

    const SECRET: &[u8] = b"service-test-secret-at-least-32-bytes!";

    fn service() -> (AuthService, Arc<InMemoryUserStore>) {
        let secret = SigningSecret::new(SECRET).unwrap();
        let clock = Arc::new(FixedClock::new(1_700_000_000));
        let issuer = Arc::new(TokenIssuer::new(&secret, 3600, 86400, clock));
        let store = Arc::new(InMemoryUserStore::new());
        (AuthService::new(store.clone(), issuer, 6), store)
    }

    fn signup_request(email: &str, phone: &str) -> SignupRequest {
        SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            phone: phone.to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let (service, store) = service();

        let signed_up = service
            .signup(signup_request("chef@example.com", "555-0100"))
            .await
            .unwrap();
        assert_eq!(signed_up.expires_in, 3600);
        assert_eq!(signed_up.user.email, "chef@example.com");

        let logged_in = service
            .login(LoginRequest {
                email: "chef@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.user_id, signed_up.user.user_id);

        let stored = store
            .find_by_id(&signed_up.user.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "secret123");
        assert_eq!(stored.access_token.as_deref(), Some(logged_in.access_token.as_str()));
    }

    #[tokio::test]
    async fn test_duplicate_signup_rejected() {
        let (service, _) = service();
        service
            .signup(signup_request("chef@example.com", "555-0100"))
            .await
            .unwrap();

        let err = service
            .signup(signup_request("chef@example.com", "555-0199"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = service
            .signup(signup_request("other@example.com", "555-0100"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_invalid_signup_rejected() {
        let (service, _) = service();
        let err = service
            .signup(signup_request("not-an-email", "555-0100"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_failures() {
        let (service, _) = service();
        service
            .signup(signup_request("chef@example.com", "555-0100"))
            .await
            .unwrap();

        let wrong_password = service
            .login(LoginRequest {
                email: "chef@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;
        assert!(matches!(wrong_password, Err(AppError::Unauthorized)));

        let unknown = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await;
        assert!(matches!(unknown, Err(AppError::Unauthorized)));
    }
}
