//! Integration tests for the Mithai admin.
//!
//! # Running Tests
//!
//! ```bash
//! # Run migrations and start the admin server
//! cargo run -p mithai-cli -- migrate
//! cargo run -p mithai-admin
//!
//! # Run integration tests
//! cargo test -p mithai-integration-tests -- --ignored
//! ```
//!
//! The tests live in `tests/` and are `#[ignore]`d by default because they
//! need a running server and database. `ADMIN_BASE_URL` overrides the
//! default `http://localhost:3001`.

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create an HTTP client with a cookie store for session handling.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
