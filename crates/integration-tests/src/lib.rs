//! Black-box HTTP tests for a running Juice Shop server.
//!
//! # Running Tests
//!
//! ```bash
//! js-cli migrate
//! js-cli seed crates/cli/fixtures/demo.yaml
//! cargo run -p juice-shop-server &
//! cargo test -p juice-shop-integration-tests -- --ignored
//! ```
//!
//! `JUICE_BASE_URL` points the tests at another server
//! (default: <http://localhost:3000>). The tests expect the demo fixture's
//! users and serve files from the repository's `ftp/` folder.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Demo fixture user with one basket.
pub const JIM: (&str, &str) = ("jim@juice-sh.op", "ncc-1701");

/// Demo fixture user whose basket holds a deleted product.
pub const BENDER: (&str, &str) = ("bender@juice-sh.op", "OhG0dPlease1nsertLiquor!");

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("JUICE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub authentication: Authentication,
}

#[derive(Debug, Deserialize)]
pub struct Authentication {
    pub umail: String,
    pub bid: i64,
}

/// Log `client` in and return the basket ID from the response.
///
/// # Panics
///
/// Panics if the request fails or the credentials are rejected.
pub async fn login(client: &Client, (email, password): (&str, &str)) -> i64 {
    let response = client
        .post(format!("{}/rest/user/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(
        response.status().is_success(),
        "login as {email} failed: {}",
        response.status()
    );

    let body: LoginResponse = response.json().await.expect("Invalid login response");
    assert_eq!(body.authentication.umail, email);
    body.authentication.bid
}

/// Whether the score board lists `key` as solved.
///
/// # Panics
///
/// Panics if the request fails or the response is malformed.
pub async fn is_solved(client: &Client, key: &str) -> bool {
    let body: serde_json::Value = client
        .get(format!("{}/api/challenges", base_url()))
        .send()
        .await
        .expect("Failed to list challenges")
        .json()
        .await
        .expect("Invalid challenge list");

    body["data"]
        .as_array()
        .expect("challenge list is not an array")
        .iter()
        .any(|challenge| challenge["key"] == key && challenge["solved"] == true)
}
