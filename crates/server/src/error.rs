//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Client errors are answered
//! locally with the message the shop has always sent; server errors are
//! logged, captured to Sentry and answered with a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, FileAccessError};

/// Body of a failed login.
pub const INVALID_LOGIN: &str = "Invalid email or password.";

/// `error` field of the 401 sent to anonymous callers of protected routes.
pub const LOGIN_REQUIRED: &str = "You must be logged in to access this resource.";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Requested file was refused by the FTP folder guard.
    #[error("Forbidden: {0}")]
    Forbidden(#[from] FileAccessError),

    /// Resource not found. The message is sent as a plain-text body.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated. The message is sent as `{ "error": ... }`.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

}

impl AppError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Session(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }

        match self {
            Self::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            Self::Forbidden(reason) => {
                tracing::debug!(%reason, "File request refused");
                (StatusCode::FORBIDDEN, reason.to_string()).into_response()
            }
            Self::Auth(err) => {
                let status = match err {
                    AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                    AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::UNAUTHORIZED,
                };
                let message = match err {
                    AuthError::UserAlreadyExists => {
                        "An account with this email already exists".to_string()
                    }
                    AuthError::WeakPassword(msg) => msg,
                    _ => INVALID_LOGIN.to_string(),
                };
                (status, message).into_response()
            }
            Self::Database(_) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb that shows up in later Sentry reports.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
