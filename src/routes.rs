//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{handlers, middleware::AppState};

/// 请求体上限（64 KiB）
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/users/signup", post(handlers::user::signup))
        .route("/users/login", post(handlers::user::login));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/me", get(handlers::user::get_current_user))
        .route("/users/{user_id}", get(handlers::user::get_user))
        // route_layer：未匹配的路径仍然返回 404 而不是 401
        .route_layer(axum::middleware::from_fn_with_state(
            state.validator.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
