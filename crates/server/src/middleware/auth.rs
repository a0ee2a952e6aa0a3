//! Authentication extractors.
//!
//! The logged-in user lives in the session under
//! [`session_keys::CURRENT_USER`]. [`AuthenticatedUser`] answers a missing
//! user with the JSON 401 the REST API uses; [`OptionalUser`] never rejects.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{AppError, LOGIN_REQUIRED};
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user.
///
/// Rejects with `401 { "error": "You must be logged in to access this resource." }`
/// before the handler body runs.
pub struct AuthenticatedUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        user.map(Self)
            .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))
    }
}

/// Extractor for the logged-in user, if any. Never rejects.
///
/// Requests without a session layer, without a session, or with an
/// unreadable session entry all yield `None`.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Unreadable session, treating as anonymous");
                    None
                }),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the logged-in user in the session.
///
/// The session ID is cycled first so a pre-login session ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Remove the logged-in user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
