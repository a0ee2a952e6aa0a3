//! Juice Shop server library.
//!
//! Baskets, the public FTP folder and challenge tracking, served over axum.
//! The binary in `main.rs` wires these modules together; the CLI reuses the
//! database layer for migrations and seeding.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
