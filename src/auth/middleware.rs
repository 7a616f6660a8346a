//! JWT 认证中间件（访问闸门）
//!
//! Received -> HeaderChecked -> TokenIsolated -> Validated -> Admitted，
//! 任一步失败都直接返回 401，被保护的 handler 不会执行。

use crate::{
    auth::validator::{TokenError, TokenValidator},
    error::AppError,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// 访问闸门的拒绝原因
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredential,

    #[error("Malformed authorization header")]
    MalformedCredential,

    #[error("Token rejected: {0}")]
    Token(#[from] TokenError),

    /// 令牌有效但不包含身份信息（例如 refresh token）
    #[error("Token carries no identity")]
    MissingIdentity,
}

impl AuthError {
    /// 返回给客户端的消息
    ///
    /// 三种令牌错误使用同一条消息，客户端无法区分签名错误和过期
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "Missing authorization header",
            AuthError::MalformedCredential => "Malformed authorization header",
            AuthError::Token(_) | AuthError::MissingIdentity => "Invalid or expired token",
        }
    }
}

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    pub email: String,
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取令牌
///
/// 头部格式：`Bearer <token>`（scheme 不区分大小写）
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AuthError::MissingCredential)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AuthError::MalformedCredential)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return Err(AuthError::MalformedCredential);
    }

    Ok(token)
}

/// 校验令牌并生成认证上下文
pub fn authenticate(validator: &TokenValidator, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
    let token = extract_token(headers)?;
    let claims = validator.validate(token)?;

    if !claims.has_identity() {
        return Err(AuthError::MissingIdentity);
    }

    Ok(AuthContext {
        email: claims.email.unwrap_or_default(),
        user_id: claims.user_id.unwrap_or_default(),
        first_name: claims.first_name,
        last_name: claims.last_name,
    })
}

/// JWT 认证中间件 - 必须认证
pub async fn jwt_auth_middleware(
    State(validator): State<Arc<TokenValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = authenticate(&validator, req.headers()).map_err(|e| {
        tracing::debug!(
            reason = %e,
            uri = %req.uri().path(),
            "Request rejected by auth gate"
        );
        AppError::Auth(e)
    })?;

    tracing::debug!(user_id = %auth_context.user_id, "Request admitted");

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
