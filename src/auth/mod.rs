//! Authentication and authorization module

pub mod claims;
pub mod clock;
pub mod issuer;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod validator;

pub use claims::{Claims, Identity};
pub use clock::{Clock, FixedClock, SystemClock};
pub use issuer::TokenIssuer;
pub use jwt::{SigningSecret, TokenPair};
pub use middleware::{authenticate, extract_token, jwt_auth_middleware, AuthContext, AuthError};
pub use password::PasswordHasher;
pub use validator::{TokenError, TokenValidator};
