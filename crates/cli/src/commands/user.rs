//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! js-cli user create -e jim@juice-sh.op -p ncc-1701
//! ```

use thiserror::Error;

use juice_shop_core::UserId;
use juice_shop_server::services::{AuthError, AuthService};

use super::CommandError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a user with an Argon2-hashed password.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError` if the email is invalid, the password too short, the
/// email already registered, or the database unreachable.
pub async fn create(email: &str, password: &str) -> Result<UserId, UserError> {
    let pool = super::connect().await?;

    let user = AuthService::new(&pool).register(email, password).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");
    Ok(user.id)
}
