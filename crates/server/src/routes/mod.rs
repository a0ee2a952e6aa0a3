//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Baskets
//! GET  /rest/basket/{id}       - Basket with its products (requires login)
//!
//! # Users
//! POST /rest/user/login        - Password login, stores the user in the session
//! POST /rest/user/logout       - Drop the session
//! GET  /rest/user/whoami       - Current user, or an empty object
//!
//! # FTP folder
//! GET  /ftp/{file}             - Serve an allow-listed file from the FTP folder
//!
//! # Score board
//! GET  /api/challenges         - Every challenge with its solved flag
//! ```

pub mod auth;
pub mod basket;
pub mod challenges;
pub mod file_server;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Envelope for JSON API responses: `{ "status": "success", "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/whoami", get(auth::whoami))
}

/// Create all routes for the shop.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rest/basket/{id}", get(basket::show))
        .nest("/rest/user", user_routes())
        .route("/ftp/{file}", get(file_server::serve))
        .route("/api/challenges", get(challenges::index))
}
