//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! js-cli migrate
//! ```
//!
//! Runs the migrations embedded from `crates/server/migrations/`. The
//! session table is not managed here; the server creates it on startup.

use thiserror::Error;

use juice_shop_server::db;

use super::CommandError;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
