//! Authentication: password hashing, identity tokens, register/login flows.

pub mod authenticator;
pub mod jwt;
pub mod password;

use thiserror::Error;

use crate::store::StoreError;

pub use authenticator::{AuthSession, Authenticator, RegisterInput};
pub use jwt::TokenService;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login failure. Same shape whether the email is unknown or the
    /// password is wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or badly signed token.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Email already exists")]
    AlreadyExists,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
