//! Score board route.

use axum::{Json, extract::State};

use super::ApiResponse;
use crate::services::ChallengeStatus;
use crate::state::AppState;

/// List every challenge with its solved flag.
pub async fn index(State(state): State<AppState>) -> Json<ApiResponse<Vec<ChallengeStatus>>> {
    Json(ApiResponse::success(state.challenges().snapshot()))
}
