//! Login route handlers.
//!
//! Login is a stateless password check; no session or token is issued.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use catalog_core::Email;

use super::customers::CUSTOMER_NOT_FOUND;
use super::{ApiJson, ApiQuery, message};
use crate::error::{AppError, Result};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

const CREDENTIALS_REQUIRED: &str = "Email e senha são obrigatórios";

/// Body of `POST /login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "senha", alias = "password")]
    pub password: Option<String>,
}

/// Query of `GET /login`.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub email: Option<String>,
}

/// `POST /login`
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<Value>> {
    let email = body.email.filter(|s| !s.is_empty());
    let password = body.password.filter(|s| !s.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::validation(CREDENTIALS_REQUIRED));
    };

    // A malformed address cannot belong to any customer.
    let email = Email::parse(&email).map_err(|_| AuthError::CustomerNotFound)?;

    match AuthService::new(state.store()).login(&email, &password).await {
        Ok(customer) => {
            tracing::info!(customer_id = %customer.id, "Login succeeded");
            Ok(message("Login realizado com sucesso"))
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Err(e.into())
        }
    }
}

/// `GET /login`: every customer's id and email, or one customer by `?email=`.
#[instrument(skip(state))]
pub async fn lookup(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LookupQuery>,
) -> Result<Response> {
    let store = state.store();

    if let Some(raw) = query.email {
        let customer = match Email::parse(&raw) {
            Ok(email) => store.find_customer_by_email(&email).await?,
            Err(_) => None,
        };
        let customer = customer.ok_or_else(|| AppError::not_found(CUSTOMER_NOT_FOUND))?;
        return Ok(Json(json!({ "_id": customer.id, "nome": customer.name })).into_response());
    }

    let customers: Vec<Value> = store
        .list_customers()
        .await?
        .into_iter()
        .map(|c| json!({ "_id": c.id, "email": c.email }))
        .collect();
    Ok(Json(customers).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::routes::test_support::{app, create_customer, send};

    #[tokio::test]
    async fn test_login_flow() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::POST,
            "/clientes",
            Some(json!({ "nome": "Ana", "email": "ana@x.com", "senha": "s3cret" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "email": "ana@x.com", "senha": "s3cret" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login realizado com sucesso");

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "email": "ana@x.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["erro"], "Senha incorreta");

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "email": "zed@x.com", "senha": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["erro"], CUSTOMER_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/login",
            Some(json!({ "email": "ana@x.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["erro"], CREDENTIALS_REQUIRED);
    }

    #[tokio::test]
    async fn test_customer_without_password_cannot_log_in() {
        let app = app();
        create_customer(&app, "ana@x.com").await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "email": "ana@x.com", "senha": "anything" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lookup() {
        let app = app();
        let id = create_customer(&app, "ana@x.com").await;

        let (status, body) = send(&app, Method::GET, "/login", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "_id": id, "email": "ana@x.com" }]));

        let (status, body) = send(&app, Method::GET, "/login?email=ana@x.com", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "_id": id, "nome": "Ana" }));

        let (status, _) = send(&app, Method::GET, "/login?email=zed@x.com", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
