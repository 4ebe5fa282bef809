//! Integration test support for the catalog service.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no database needed)
//! cargo test -p catalog-integration-tests
//!
//! # Live tests against a running server backed by PostgreSQL
//! CATALOG_BASE_URL=http://localhost:5000 \
//!     cargo test -p catalog-integration-tests -- --ignored
//! ```

use std::sync::Arc;

use reqwest::Client;
use uuid::Uuid;

use catalog_server::db::MemoryStore;
use catalog_server::state::AppState;

/// A server under test and a client pointed at it.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Serve the full application on an ephemeral port with an in-memory store.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_app() -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read local address");

    let app = catalog_server::app(AppState::new(Arc::new(MemoryStore::new())));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    TestServer {
        base_url: format!("http://{addr}"),
        client: Client::new(),
    }
}

/// A running server, from `CATALOG_BASE_URL` (default `http://localhost:5000`).
#[must_use]
pub fn live_server() -> TestServer {
    TestServer {
        base_url: std::env::var("CATALOG_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string()),
        client: Client::new(),
    }
}

/// An email no other test run uses.
#[must_use]
pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4().simple())
}

/// A 10-character alphanumeric navigation ID no other test run uses.
#[must_use]
pub fn unique_navigation_id() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(10)
        .collect()
}
