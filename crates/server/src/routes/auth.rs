//! Login, logout and current-user routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use juice_shop_core::{BasketId, Email};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::services::AuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authentication: Authentication,
}

#[derive(Debug, Serialize)]
pub struct Authentication {
    pub umail: Email,
    pub bid: Option<BasketId>,
}

/// Verify credentials and store the user in the session.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = AuthService::new(state.pool())
        .login(&request.email, &request.password)
        .await
        .inspect_err(|e| tracing::info!(error = %e, "Login failed"))?;

    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        authentication: Authentication {
            umail: user.email,
            bid: user.bid,
        },
    }))
}

/// Drop the session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in user, or an empty object for anonymous callers.
pub async fn whoami(OptionalUser(user): OptionalUser) -> Json<Value> {
    let user = user.map_or_else(
        || json!({}),
        |user| json!({ "id": user.id, "email": user.email }),
    );
    Json(json!({ "user": user }))
}
