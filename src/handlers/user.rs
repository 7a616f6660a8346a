//! 用户相关的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{auth::*, user::*},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 注册
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.signup(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.login(req).await?;
    Ok(Json(response))
}

/// 分页列出用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (offset, limit) = query.offset_limit();

    tracing::debug!(user_id = %auth_context.user_id, offset, limit, "Listing users");

    let total_count = state.users.count().await?;
    let user_items = state
        .users
        .list(offset, limit)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(UserListResponse {
        total_count,
        user_items,
    }))
}

/// 获取当前用户（令牌中的身份）
pub async fn get_current_user(auth_context: AuthContext) -> Json<AuthContext> {
    Json(auth_context)
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(Json(UserResponse::from(user)))
}
