//! 数据模型

pub mod auth;
pub mod user;

pub use auth::{AuthResponse, LoginRequest, SignupRequest};
pub use user::{ListUsersQuery, User, UserListResponse, UserResponse};
