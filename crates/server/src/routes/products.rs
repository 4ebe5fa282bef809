//! Product route handlers.
//!
//! Products are addressed either by record id or by `navigation_id`; see
//! [`ProductKey`].

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use catalog_core::{NavigationId, Price};

use super::{
    ApiJson, ApiPath, ApiQuery, INVALID_NAVIGATION_ID, NO_UPDATABLE_FIELDS, conflict_as, message,
    update_body,
};
use crate::db::CatalogStore;
use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductKey, ProductPatch};
use crate::state::AppState;

const REQUIRED_FIELDS: &str = "navigation_id, title e price são obrigatórios";
const PRODUCT_EXISTS: &str = "Produto já existe";
const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";
const NO_PRODUCTS: &str = "Nenhum produto encontrado";
const INVALID_PRICE: &str = "O preço deve ser maior que zero";
const EMPTY_TITLE: &str = "O título não pode ser vazio";
const INVALID_KEY: &str = "ID ou navigation_id inválido";

// =============================================================================
// Request bodies
// =============================================================================

/// Body of `POST /produtos`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub navigation_id: Option<String>,
    #[serde(default, alias = "nome")]
    pub title: Option<String>,
    #[serde(default, alias = "preco")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub review_score: Option<Decimal>,
}

impl CreateProductRequest {
    /// Check required fields, the `navigation_id` format and the price.
    ///
    /// A zero price counts as missing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` describing the first problem found.
    pub fn validate(self) -> Result<NewProduct> {
        let navigation_id = self.navigation_id.filter(|s| !s.is_empty());
        let title = self.title.filter(|s| !s.is_empty());
        let price = self.price.filter(|p| !p.is_zero());
        let (Some(navigation_id), Some(title), Some(price)) = (navigation_id, title, price) else {
            return Err(AppError::validation(REQUIRED_FIELDS));
        };

        let navigation_id = NavigationId::parse(&navigation_id)
            .map_err(|_| AppError::validation(INVALID_NAVIGATION_ID))?;
        let price = Price::new(price).map_err(|_| AppError::validation(INVALID_PRICE))?;

        Ok(NewProduct {
            navigation_id,
            title,
            price,
            description: self.description,
            image: self.image,
            brand: self.brand,
            review_score: self.review_score,
        })
    }
}

/// Body of `PUT /produtos/{key}`. `navigation_id` and unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default, alias = "nome")]
    pub title: Option<String>,
    #[serde(default, alias = "preco")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub review_score: Option<Decimal>,
}

impl UpdateProductRequest {
    /// Validate supplied values into a patch.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if nothing is supplied, the title is
    /// empty or the price is not positive.
    pub fn into_patch(self) -> Result<ProductPatch> {
        if self.title.as_deref() == Some("") {
            return Err(AppError::validation(EMPTY_TITLE));
        }
        let price = self
            .price
            .map(Price::new)
            .transpose()
            .map_err(|_| AppError::validation(INVALID_PRICE))?;

        let patch = ProductPatch {
            title: self.title,
            price,
            description: self.description,
            image: self.image,
            brand: self.brand,
            review_score: self.review_score,
        };
        if patch.is_empty() {
            return Err(AppError::validation(NO_UPDATABLE_FIELDS));
        }
        Ok(patch)
    }
}

/// Query of `GET /produtos`.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub navigation_id: Option<String>,
}

fn parse_key(raw: &str) -> Result<ProductKey> {
    ProductKey::parse(raw).map_err(|_| AppError::validation(INVALID_KEY))
}

async fn find_by_key(store: &dyn CatalogStore, key: &ProductKey) -> Result<Option<Product>> {
    let product = match key {
        ProductKey::Id(id) => store.get_product(*id).await?,
        ProductKey::NavigationId(nav) => store.find_product_by_navigation_id(nav).await?,
    };
    Ok(product)
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /produtos`
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let new_product = body.validate()?;
    let store = state.store();

    if store
        .find_product_by_navigation_id(&new_product.navigation_id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(PRODUCT_EXISTS));
    }

    let product = store
        .insert_product(new_product)
        .await
        .map_err(conflict_as(PRODUCT_EXISTS))?;

    tracing::info!(
        product_id = %product.id,
        navigation_id = %product.navigation_id,
        "Product created"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "_id": product.id, "navigation_id": product.navigation_id })),
    ))
}

/// `GET /produtos`, or a single product with `?navigation_id=`.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Response> {
    let store = state.store();

    if let Some(raw) = query.navigation_id {
        // A malformed navigation_id cannot match any product.
        let product = match NavigationId::parse(&raw) {
            Ok(nav) => store.find_product_by_navigation_id(&nav).await?,
            Err(_) => None,
        };
        return product
            .map(|p| Json(p).into_response())
            .ok_or_else(|| AppError::not_found(PRODUCT_NOT_FOUND));
    }

    let products = store.list_products().await?;
    if products.is_empty() {
        return Ok(message(NO_PRODUCTS).into_response());
    }
    Ok(Json(products).into_response())
}

/// `GET /produtos/{key}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> Result<Json<Product>> {
    let key = parse_key(&key)?;
    find_by_key(state.store(), &key)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(PRODUCT_NOT_FOUND))
}

/// `PUT /produtos/{key}`
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
    payload: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>> {
    let body: UpdateProductRequest = update_body(payload)?;
    let patch = body.into_patch()?;
    let key = parse_key(&key)?;

    if !state.store().update_product(&key, patch).await? {
        return Err(AppError::not_found(PRODUCT_NOT_FOUND));
    }

    tracing::info!(key = ?key, "Product updated");
    Ok(message("Produto atualizado com sucesso"))
}

/// `DELETE /produtos/{key}`
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> Result<Json<Value>> {
    let key = parse_key(&key)?;
    if !state.store().delete_product(&key).await? {
        return Err(AppError::not_found(PRODUCT_NOT_FOUND));
    }

    tracing::info!(key = ?key, "Product deleted");
    Ok(message("Produto excluído com sucesso"))
}
