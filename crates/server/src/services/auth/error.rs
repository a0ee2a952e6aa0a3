//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] juice_shop_core::EmailError),

    /// Wrong password or unknown user. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("password validation failed: {0}")]
    WeakPassword(String),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("password hashing error")]
    PasswordHash,
}
