//! Customer route handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use catalog_core::{Email, RecordId};

use super::{
    ApiJson, ApiPath, NO_UPDATABLE_FIELDS, conflict_as, message, parse_id, update_body,
};
use crate::error::{AppError, Result};
use crate::models::{Customer, CustomerPatch, NewCustomer};
use crate::services::auth::hash_password;
use crate::state::AppState;

const REQUIRED_FIELDS: &str =
    "Nome e email são obrigatórios. Preencha todos os campos para continuar o cadastro";
const EMAIL_IN_USE: &str = "Email já está em uso.";
const INVALID_EMAIL: &str = "Email inválido";
const EMPTY_NAME: &str = "Nome não pode ser vazio";
const EMPTY_PASSWORD: &str = "Senha não pode ser vazia";
pub(crate) const CUSTOMER_NOT_FOUND: &str = "Cliente não encontrado";

// =============================================================================
// Request bodies
// =============================================================================

/// Body of `POST /clientes`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default, rename = "nome", alias = "name")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "telefone", alias = "phone")]
    pub phone: Option<String>,
    #[serde(default, rename = "senha", alias = "password")]
    pub password: Option<String>,
}

/// Validated fields of a create request; the password is still plaintext.
#[derive(Debug)]
pub struct CustomerInput {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl CreateCustomerRequest {
    /// Check required fields and the email format.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `nome` or `email` is missing or empty,
    /// or if the email is malformed.
    pub fn validate(self) -> Result<CustomerInput> {
        let name = self.name.filter(|s| !s.is_empty());
        let email = self.email.filter(|s| !s.is_empty());
        let (Some(name), Some(email)) = (name, email) else {
            return Err(AppError::validation(REQUIRED_FIELDS));
        };

        let email = Email::parse(&email).map_err(|_| AppError::validation(INVALID_EMAIL))?;

        Ok(CustomerInput {
            name,
            email,
            phone: self.phone,
            password: self.password.filter(|s| !s.is_empty()),
        })
    }
}

/// Body of `PUT /clientes/{id}`. Keys outside the allow-list are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default, rename = "nome", alias = "name")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "telefone", alias = "phone")]
    pub phone: Option<String>,
    #[serde(default, rename = "senha", alias = "password")]
    pub password: Option<String>,
}

impl UpdateCustomerRequest {
    /// Returns true if no allow-listed field was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.password.is_none()
    }

    /// Validate supplied values into a patch, hashing a new password.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an empty name or password or a
    /// malformed email.
    pub fn into_patch(self) -> Result<CustomerPatch> {
        if self.name.as_deref() == Some("") {
            return Err(AppError::validation(EMPTY_NAME));
        }
        if self.password.as_deref() == Some("") {
            return Err(AppError::validation(EMPTY_PASSWORD));
        }

        let email = self
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|_| AppError::validation(INVALID_EMAIL))?;
        let password_hash = self.password.as_deref().map(hash_password).transpose()?;

        Ok(CustomerPatch {
            name: self.name,
            email,
            phone: self.phone,
            password_hash,
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /clientes`
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let input = body.validate()?;
    let store = state.store();

    if store.find_customer_by_email(&input.email).await?.is_some() {
        return Err(AppError::conflict(EMAIL_IN_USE));
    }

    let password_hash = input.password.as_deref().map(hash_password).transpose()?;
    let customer = store
        .insert_customer(NewCustomer {
            name: input.name,
            email: input.email,
            phone: input.phone,
            password_hash,
        })
        .await
        .map_err(conflict_as(EMAIL_IN_USE))?;

    tracing::info!(customer_id = %customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(json!({ "_id": customer.id }))))
}

/// `GET /clientes`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    Ok(Json(state.store().list_customers().await?))
}

/// `GET /clientes/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Customer>> {
    let id = parse_id(&id)?;
    state
        .store()
        .get_customer(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(CUSTOMER_NOT_FOUND))
}

/// `PUT /clientes/{id}`
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    payload: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>> {
    let body: UpdateCustomerRequest = update_body(payload)?;
    if body.is_empty() {
        return Err(AppError::validation(NO_UPDATABLE_FIELDS));
    }
    let id = parse_id(&id)?;
    let patch = body.into_patch()?;
    let store = state.store();

    if store.get_customer(id).await?.is_none() {
        return Err(AppError::not_found(CUSTOMER_NOT_FOUND));
    }
    if let Some(email) = &patch.email {
        ensure_email_free(store, email, id).await?;
    }

    let updated = store
        .update_customer(id, patch)
        .await
        .map_err(conflict_as(EMAIL_IN_USE))?;
    if !updated {
        return Err(AppError::not_found(CUSTOMER_NOT_FOUND));
    }

    tracing::info!(customer_id = %id, "Customer updated");
    Ok(message("Cliente atualizado com sucesso"))
}

/// `DELETE /clientes/{id}`
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id)?;
    if !state.store().delete_customer(id).await? {
        return Err(AppError::not_found(CUSTOMER_NOT_FOUND));
    }

    tracing::info!(customer_id = %id, "Customer deleted");
    Ok(message("Cliente deletado com sucesso"))
}

/// Fail with a conflict if `email` belongs to a customer other than `id`.
async fn ensure_email_free(
    store: &dyn crate::db::CatalogStore,
    email: &Email,
    id: RecordId,
) -> Result<()> {
    match store.find_customer_by_email(email).await? {
        Some(other) if other.id != id => Err(AppError::conflict(EMAIL_IN_USE)),
        _ => Ok(()),
    }
}
