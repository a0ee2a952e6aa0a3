//! Business logic behind the route handlers.

pub mod auth;
pub mod challenges;
pub mod file_guard;
pub mod i18n;

pub use auth::{AuthError, AuthService};
pub use challenges::{ChallengeRegistry, ChallengeStatus};
pub use file_guard::{FileAccessError, FileGuard};
pub use i18n::{Locale, Translator};
