//! 测试公共模块
//! 提供测试辅助函数和测试工具

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use restaurant_auth::{
    auth::{
        clock::FixedClock, issuer::TokenIssuer, jwt::SigningSecret, validator::TokenValidator,
        Clock,
    },
    config::{AppConfig, LoggingConfig, SecurityConfig, ServerConfig},
    middleware::AppState,
    repository::{InMemoryUserStore, UserStore},
    routes,
    services::AuthService,
};
use secrecy::Secret;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 固定起始时间，便于断言 exp
pub const TEST_NOW: i64 = 1_700_000_000;

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            access_token_exp_secs: 300,   // 5分钟用于测试
            refresh_token_exp_secs: 3600, // 1小时用于测试
            password_min_length: 8,
        },
    }
}

/// 测试应用：状态加上可拨动的时钟
pub struct TestApp {
    pub state: Arc<AppState>,
    pub clock: Arc<FixedClock>,
    pub issuer: Arc<TokenIssuer>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }
}

/// 创建测试应用状态
pub fn create_test_app_state() -> TestApp {
    let config = create_test_config();
    let secret = SigningSecret::from_config(&config).expect("Failed to create signing secret");

    let clock = Arc::new(FixedClock::new(TEST_NOW));
    let dyn_clock: Arc<dyn Clock> = clock.clone();

    let issuer = Arc::new(TokenIssuer::from_config(&config, &secret, dyn_clock.clone()));
    let validator = Arc::new(TokenValidator::new(&secret, dyn_clock));
    let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());

    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        issuer.clone(),
        config.security.password_min_length,
    ));

    let state = Arc::new(AppState {
        auth_service,
        users,
        validator,
    });

    TestApp {
        state,
        clock,
        issuer,
    }
}

/// 发送 JSON POST 请求
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let body = body.to_string();
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// 发送 GET 请求，可选 Authorization 头
pub async fn get(app: Router, uri: &str, authorization: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// 读取 JSON 响应体
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// 注册测试用户，返回响应 JSON
pub async fn signup_user(app: &TestApp, email: &str, phone: &str) -> Value {
    let response = post_json(
        app.router(),
        "/users/signup",
        serde_json::json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": email,
            "password": "TestPass123",
            "phone": phone,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    read_json(response).await
}
