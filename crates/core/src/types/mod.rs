//! Core types for Juice Shop.

pub mod challenge;
pub mod email;
pub mod id;

pub use challenge::{ChallengeCategory, ChallengeKey, UnknownChallenge};
pub use email::{Email, EmailError};
pub use id::*;
