//! End-to-end tests over real HTTP.
//!
//! The in-process tests start the application on an ephemeral port with an
//! in-memory store. Tests marked `#[ignore]` need a running server backed by
//! `PostgreSQL`:
//!
//! - `cargo run -p catalog-cli -- migrate`
//! - `cargo run -p catalog-server`
//! - `cargo test -p catalog-integration-tests -- --ignored`

use reqwest::StatusCode;
use serde_json::{Value, json};

use catalog_integration_tests::{
    TestServer, live_server, spawn_app, unique_email, unique_navigation_id,
};

async fn create_customer(server: &TestServer, email: &str) -> String {
    let resp = server
        .client
        .post(server.url("/clientes"))
        .json(&json!({ "nome": "Teste", "email": email }))
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Invalid JSON");
    body["_id"].as_str().expect("Missing _id").to_owned()
}

async fn create_product(server: &TestServer, navigation_id: &str) {
    let resp = server
        .client
        .post(server.url("/produtos"))
        .json(&json!({
            "navigation_id": navigation_id,
            "title": "Produto Teste",
            "price": 99.9,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
}

/// Create a customer, favorite a product, list it, remove it, list again.
async fn favorites_round_trip(server: &TestServer) {
    let customer_id = create_customer(server, &unique_email()).await;
    let navigation_id = unique_navigation_id();
    create_product(server, &navigation_id).await;

    let favorites_url = server.url(&format!("/clientes/{customer_id}/favoritos"));

    let resp = server
        .client
        .post(&favorites_url)
        .json(&json!({ "navigation_id": navigation_id }))
        .send()
        .await
        .expect("Failed to add favorite");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = server
        .client
        .get(&favorites_url)
        .send()
        .await
        .expect("Failed to list favorites");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    let favorites = body.as_array().expect("Expected a list");
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["navigation_id"], navigation_id.as_str());
    assert_eq!(favorites[0]["price"], 99.9);

    let resp = server
        .client
        .delete(format!("{favorites_url}/{navigation_id}"))
        .send()
        .await
        .expect("Failed to remove favorite");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = server
        .client
        .get(&favorites_url)
        .send()
        .await
        .expect("Failed to list favorites")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(body, json!({ "message": "Nenhum produto nos favoritos" }));
}

// ============================================================================
// In-process
// ============================================================================

#[tokio::test]
async fn test_favorites_round_trip() {
    favorites_round_trip(&spawn_app().await).await;
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = spawn_app().await;

    let resp = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "it-123")
        .send()
        .await
        .expect("Failed to call health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-request-id"], "it-123");

    let resp = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("Failed to call index");
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let server = spawn_app().await;
    let email = unique_email();
    create_customer(&server, &email).await;

    let resp = server
        .client
        .post(server.url("/clientes"))
        .json(&json!({ "nome": "Outro", "email": email }))
        .send()
        .await
        .expect("Failed to post customer");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["erro"], "Email já está em uso.");
}

#[tokio::test]
async fn test_concurrent_duplicate_products() {
    let server = spawn_app().await;
    let navigation_id = unique_navigation_id();

    let attempts = (0..8).map(|_| {
        server
            .client
            .post(server.url("/produtos"))
            .json(&json!({ "navigation_id": navigation_id, "title": "x", "price": 1 }))
            .send()
    });
    let responses = statuses_of(attempts).await;

    let created = responses
        .iter()
        .filter(|s| **s == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    assert!(
        responses
            .iter()
            .all(|s| *s == StatusCode::CREATED || *s == StatusCode::BAD_REQUEST)
    );
}

async fn statuses_of<F>(requests: impl Iterator<Item = F>) -> Vec<StatusCode>
where
    F: std::future::Future<Output = reqwest::Result<reqwest::Response>> + Send + 'static,
{
    let handles: Vec<_> = requests.map(tokio::spawn).collect();
    let mut statuses = Vec::with_capacity(handles.len());
    for handle in handles {
        let resp = handle
            .await
            .expect("Task panicked")
            .expect("Request failed");
        statuses.push(resp.status());
    }
    statuses
}

// ============================================================================
// Live server
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running catalog server backed by PostgreSQL"]
async fn test_live_favorites_round_trip() {
    favorites_round_trip(&live_server()).await;
}

#[tokio::test]
#[ignore = "Requires a running catalog server backed by PostgreSQL"]
async fn test_live_readiness() {
    let server = live_server();
    let resp = server
        .client
        .get(server.url("/health/ready"))
        .send()
        .await
        .expect("Failed to call readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running catalog server backed by PostgreSQL"]
async fn test_live_delete_missing_customer_is_404() {
    let server = live_server();
    let missing = "000000000000000000000000";
    for _ in 0..2 {
        let resp = server
            .client
            .delete(server.url(&format!("/clientes/{missing}")))
            .send()
            .await
            .expect("Failed to delete customer");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
