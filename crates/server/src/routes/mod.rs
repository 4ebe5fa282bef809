//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Welcome message
//! GET  /test-db                   - Store probe (always 200)
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness (503 if the store is down)
//!
//! # Customers
//! POST   /clientes                - Create customer
//! GET    /clientes                - List customers
//! GET    /clientes/{id}           - Get customer
//! PUT    /clientes/{id}           - Partial update
//! DELETE /clientes/{id}           - Delete customer and its favorites
//!
//! # Favorites
//! POST   /clientes/{id}/favoritos                  - Add product snapshot
//! GET    /clientes/{id}/favoritos                  - List snapshots
//! DELETE /clientes/{id}/favoritos/{navigation_id}  - Remove snapshot
//!
//! # Products ({key} is an id or a navigation_id)
//! POST   /produtos                - Create product
//! GET    /produtos                - List, or ?navigation_id= lookup
//! GET    /produtos/{key}          - Get product
//! PUT    /produtos/{key}          - Partial update
//! DELETE /produtos/{key}          - Delete product
//!
//! # Login
//! POST /login                     - Check email and password
//! GET  /login                     - Customer lookup, ?email= for one
//! ```

pub mod auth;
pub mod customers;
pub mod extract;
pub mod favorites;
pub mod home;
pub mod products;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{delete, get, post},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use catalog_core::RecordId;

use crate::db::StoreError;
use crate::error::AppError;
use crate::state::AppState;

pub use extract::{ApiJson, ApiPath, ApiQuery};

pub(crate) const INVALID_ID: &str = "ID inválido";
pub(crate) const INVALID_NAVIGATION_ID: &str =
    "navigation_id deve conter exatamente 10 caracteres alfanuméricos";
pub(crate) const MISSING_UPDATE_DATA: &str = "Dados para atualização não fornecidos";
pub(crate) const NO_UPDATABLE_FIELDS: &str = "Nenhum campo válido para atualização";

/// `{"message": ...}` success body.
pub(crate) fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

/// Parse a record id from a path segment.
pub(crate) fn parse_id(raw: &str) -> Result<RecordId, AppError> {
    RecordId::parse(raw).map_err(|_| AppError::validation(INVALID_ID))
}

/// Decode a partial-update body.
///
/// An absent, unparseable, non-object or empty body is reported as missing
/// update data; the caller decides what an object without known keys means.
pub(crate) fn update_body<T: DeserializeOwned>(
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<T, AppError> {
    let fields = match payload {
        Ok(Json(fields)) if !fields.is_empty() => fields,
        Ok(_) => return Err(AppError::validation(MISSING_UPDATE_DATA)),
        Err(rejection) => {
            tracing::debug!(detail = %rejection.body_text(), "Update body rejected");
            return Err(AppError::validation(MISSING_UPDATE_DATA));
        }
    };
    serde_json::from_value(Value::Object(fields))
        .map_err(|_| AppError::validation(MISSING_UPDATE_DATA))
}

/// Map `StoreError::Conflict` from a unique constraint to a resource message.
pub(crate) fn conflict_as(message: &'static str) -> impl FnOnce(StoreError) -> AppError {
    move |e| match e {
        StoreError::Conflict(_) => AppError::conflict(message),
        other => AppError::Store(other),
    }
}

/// Create the customer and favorites routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(customers::create).get(customers::index))
        .route(
            "/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::destroy),
        )
        .route(
            "/{id}/favoritos",
            post(favorites::add).get(favorites::index),
        )
        .route("/{id}/favoritos/{navigation_id}", delete(favorites::remove))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create).get(products::index))
        .route(
            "/{key}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create all routes for the catalog API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/test-db", get(home::test_db))
        .route("/health", get(home::health))
        .route("/health/ready", get(home::readiness))
        .nest("/clientes", customer_routes())
        .nest("/produtos", product_routes())
        .route("/login", post(auth::login).get(auth::lookup))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    //! Drive the full application in-process against a fresh `MemoryStore`.

    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::db::MemoryStore;
    use crate::state::AppState;

    pub fn app() -> Router {
        crate::app(AppState::new(Arc::new(MemoryStore::new())))
    }

    /// Send a request and decode the body as JSON, falling back to a string.
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    /// Create a customer and return its id.
    pub async fn create_customer(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/clientes",
            Some(serde_json::json!({ "nome": "Ana", "email": email })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["_id"].as_str().unwrap().to_owned()
    }

    /// Create a product and return its id.
    pub async fn create_product(app: &Router, navigation_id: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/produtos",
            Some(serde_json::json!({
                "navigation_id": navigation_id,
                "title": "Shoe",
                "price": 10.5,
                "brand": "Acme",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["_id"].as_str().unwrap().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};

    use super::test_support::{app, send};

    #[tokio::test]
    async fn test_service_endpoints() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Serviço de catálogo configurado com sucesso!");

        let (status, body) = send(&app, Method::GET, "/test-db", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Conexão com o banco de dados estabelecida com sucesso!");

        let (status, _) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(&app(), Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
