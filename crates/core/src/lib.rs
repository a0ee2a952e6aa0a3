//! Juice Shop Core - Shared domain types.
//!
//! Used by:
//! - `server` - The HTTP application (baskets, file server, challenges)
//! - `cli` - Migrations, fixtures and user management
//!
//! The core crate holds no I/O. Database support for the id newtypes is
//! behind the `postgres` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
