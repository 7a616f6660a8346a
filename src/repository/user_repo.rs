//! User repository (用户存储)
//!
//! 令牌校验从不访问存储；这里只保存用户记录和最近一次签发的令牌。

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{auth::jwt::TokenPair, error::AppError, models::user::User};

/// 凭据存储
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 新增用户，email 或 phone 重复时返回 BadRequest
    async fn insert(&self, user: User) -> Result<(), AppError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// 根据 email 查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// 是否已存在相同 email 或 phone 的用户
    async fn exists_with_email_or_phone(&self, email: &str, phone: &str) -> Result<bool, AppError>;

    /// 保存最近一次签发的令牌
    async fn update_tokens(&self, user_id: &str, tokens: &TokenPair) -> Result<(), AppError>;

    /// 按插入顺序分页
    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<User>, AppError>;

    /// 用户总数
    async fn count(&self) -> Result<usize, AppError>;
}

/// 进程内存储
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<(), AppError> {
        let mut users = self.users.write().await;

        if users
            .iter()
            .any(|u| u.email == user.email || u.phone == user.phone || u.user_id == user.user_id)
        {
            return Err(AppError::BadRequest(
                "this email or phone number already exists".to_string(),
            ));
        }

        users.push(user);
        Ok(())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn exists_with_email_or_phone(&self, email: &str, phone: &str) -> Result<bool, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email == email || u.phone == phone))
    }

    async fn update_tokens(&self, user_id: &str, tokens: &TokenPair) -> Result<(), AppError> {
        let mut users = self.users.write().await;

        let user = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| AppError::not_found("user"))?;
        user.set_tokens(tokens, Utc::now());

        Ok(())
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.users.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(n: usize) -> User {
        let now = Utc::now();
        User {
            user_id: format!("u-{}", n),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: format!("user{}@example.com", n),
            phone: format!("555-{:04}", n),
            avatar: None,
            password_hash: "hash".to_string(),
            access_token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryUserStore::new();
        store.insert(user(1)).await.unwrap();

        let found = store.find_by_email("user1@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.user_id), Some("u-1".to_string()));

        assert!(store.find_by_id("u-1").await.unwrap().is_some());
        assert!(store.find_by_id("u-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_or_phone_rejected() {
        let store = InMemoryUserStore::new();
        store.insert(user(1)).await.unwrap();

        let mut same_email = user(2);
        same_email.email = "user1@example.com".to_string();
        assert!(matches!(
            store.insert(same_email).await,
            Err(AppError::BadRequest(_))
        ));

        let mut same_phone = user(3);
        same_phone.phone = "555-0001".to_string();
        assert!(store.insert(same_phone).await.is_err());

        assert!(store
            .exists_with_email_or_phone("nobody@example.com", "555-0001")
            .await
            .unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_tokens() {
        let store = InMemoryUserStore::new();
        store.insert(user(1)).await.unwrap();

        let tokens = TokenPair {
            access_token: "a.b.c".to_string(),
            refresh_token: "d.e.f".to_string(),
            expires_in: 60,
        };
        store.update_tokens("u-1", &tokens).await.unwrap();

        let stored = store.find_by_id("u-1").await.unwrap().unwrap();
        assert_eq!(stored.access_token.as_deref(), Some("a.b.c"));
        assert_eq!(stored.refresh_token.as_deref(), Some("d.e.f"));

        assert!(matches!(
            store.update_tokens("missing", &tokens).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let store = InMemoryUserStore::new();
        for n in 1..=5 {
            store.insert(user(n)).await.unwrap();
        }

        let page: Vec<String> = store
            .list(2, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.user_id)
            .collect();
        assert_eq!(page, vec!["u-3", "u-4"]);

        assert!(store.list(10, 2).await.unwrap().is_empty());
    }
}
