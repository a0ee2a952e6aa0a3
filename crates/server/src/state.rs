//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::i18n::I18nError;
use crate::services::{ChallengeRegistry, FileGuard, Locale, Translator};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid default locale: {0}")]
    InvalidDefaultLocale(String),
    #[error("translations: {0}")]
    I18n(#[from] I18nError),
    #[error("ftp directory: {0}")]
    FtpRoot(#[from] std::io::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The challenge registry lives here so every
/// handler reports to the same flags without global state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    challenges: ChallengeRegistry,
    translator: Translator,
    files: FileGuard,
}

impl AppState {
    /// Create the application state, loading translations and resolving the
    /// FTP folder root.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the default locale is malformed, a dictionary
    /// cannot be loaded, or the working directory is unavailable.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, StateError> {
        let default_locale = Locale::parse(&config.default_locale)
            .ok_or_else(|| StateError::InvalidDefaultLocale(config.default_locale.clone()))?;
        let translator = Translator::load(&config.i18n_dir, default_locale)?;
        let files = FileGuard::new(&config.ftp_dir)?;
        tracing::info!(root = %files.root().display(), "FTP folder configured");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                challenges: ChallengeRegistry::new(),
                translator,
                files,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn challenges(&self) -> &ChallengeRegistry {
        &self.inner.challenges
    }

    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.inner.translator
    }

    /// Guard for the public FTP folder.
    #[must_use]
    pub fn files(&self) -> &FileGuard {
        &self.inner.files
    }
}
