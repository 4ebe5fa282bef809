//! Favorites route handlers.
//!
//! A favorite is a snapshot of the product taken when it is added; later edits
//! to the product are not reflected.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use catalog_core::NavigationId;

use super::customers::CUSTOMER_NOT_FOUND;
use super::{ApiJson, ApiPath, message, parse_id};
use crate::db::StoreError;
use crate::error::{AppError, Result};
use crate::services::catalog::ProductCatalog;
use crate::state::AppState;

const NAVIGATION_ID_REQUIRED: &str = "Navigation ID é obrigatório";
const PRODUCT_NOT_FOUND: &str = "Produto com o navigation ID não encontrado";
const ALREADY_FAVORITE: &str = "Produto já está nos favoritos";
const NO_FAVORITES: &str = "Nenhum produto nos favoritos";
const NOT_IN_FAVORITES: &str = "Navigation ID não encontrado nos favoritos";

/// Body of `POST /clientes/{id}/favoritos`.
#[derive(Debug, Default, Deserialize)]
pub struct AddFavoriteRequest {
    #[serde(default)]
    pub navigation_id: Option<String>,
}

/// `POST /clientes/{id}/favoritos`
#[instrument(skip(state, body))]
pub async fn add(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let customer_id = parse_id(&id)?;
    let raw = body
        .navigation_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation(NAVIGATION_ID_REQUIRED))?;
    // A malformed navigation_id is never in the catalog.
    let navigation_id =
        NavigationId::parse(&raw).map_err(|_| AppError::not_found(PRODUCT_NOT_FOUND))?;

    let store = state.store();
    let favorite = ProductCatalog::new(store)
        .snapshot(&navigation_id)
        .await?
        .ok_or_else(|| AppError::not_found(PRODUCT_NOT_FOUND))?;

    store
        .add_favorite(customer_id, favorite)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::not_found(CUSTOMER_NOT_FOUND),
            StoreError::Conflict(_) => AppError::conflict(ALREADY_FAVORITE),
            other => AppError::Store(other),
        })?;

    tracing::info!(
        customer_id = %customer_id,
        navigation_id = %navigation_id,
        "Favorite added"
    );
    Ok((
        StatusCode::CREATED,
        message("Produto adicionado aos favoritos com sucesso"),
    ))
}

/// `GET /clientes/{id}/favoritos`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Response> {
    let customer_id = parse_id(&id)?;
    let favorites = state
        .store()
        .list_favorites(customer_id)
        .await?
        .ok_or_else(|| AppError::not_found(CUSTOMER_NOT_FOUND))?;

    if favorites.is_empty() {
        return Ok(message(NO_FAVORITES).into_response());
    }
    Ok(Json(favorites).into_response())
}

/// `DELETE /clientes/{id}/favoritos/{navigation_id}`
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    ApiPath((id, navigation_id)): ApiPath<(String, String)>,
) -> Result<Json<Value>> {
    let customer_id = parse_id(&id)?;
    let store = state.store();

    // A malformed navigation_id is never among the favorites, but the customer
    // must still exist for that to be the answer.
    let Ok(navigation_id) = NavigationId::parse(&navigation_id) else {
        return match store.get_customer(customer_id).await? {
            Some(_) => Err(AppError::not_found(NOT_IN_FAVORITES)),
            None => Err(AppError::not_found(CUSTOMER_NOT_FOUND)),
        };
    };

    let removed = store
        .remove_favorite(customer_id, &navigation_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::not_found(CUSTOMER_NOT_FOUND),
            other => AppError::Store(other),
        })?;
    if !removed {
        return Err(AppError::not_found(NOT_IN_FAVORITES));
    }

    tracing::info!(
        customer_id = %customer_id,
        navigation_id = %navigation_id,
        "Favorite removed"
    );
    Ok(message("Produto removido dos favoritos com sucesso"))
}
