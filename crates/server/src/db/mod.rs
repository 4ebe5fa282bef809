//! Storage access layer.
//!
//! Handlers talk to a single [`CatalogStore`] injected through
//! [`AppState`](crate::state::AppState). Two implementations exist:
//!
//! - [`PgStore`] - `PostgreSQL` through sqlx, used in production
//! - [`MemoryStore`] - process-local collections, used by tests and local runs
//!
//! # Database: `catalog` schema
//!
//! ## Tables
//!
//! - `customer` - Customers, unique on `email`
//! - `product` - Products, unique on `navigation_id`
//! - `favorite` - Product snapshots owned by a customer, keyed on
//!   `(customer_id, navigation_id)`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p catalog-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use catalog_core::{Email, NavigationId, RecordId};

use crate::config::{CatalogConfig, StoreBackend};
use crate::models::{
    Customer, CustomerPatch, Favorite, NewCustomer, NewProduct, Product, ProductKey, ProductPatch,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store is not configured correctly.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Persistence operations used by the HTTP handlers.
///
/// Every method is a point read or write. Uniqueness of customer emails,
/// product navigation IDs and per-customer favorites is enforced by the store
/// itself and reported as [`StoreError::Conflict`], so concurrent duplicates
/// cannot both succeed.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    // =========================================================================
    // Customers
    // =========================================================================

    /// Insert a customer under a freshly generated id.
    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError>;

    /// All customers in creation order.
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;

    async fn get_customer(&self, id: RecordId) -> Result<Option<Customer>, StoreError>;

    async fn find_customer_by_email(&self, email: &Email)
    -> Result<Option<Customer>, StoreError>;

    /// Apply a partial update. Returns `false` if no customer matched.
    async fn update_customer(&self, id: RecordId, patch: CustomerPatch)
    -> Result<bool, StoreError>;

    /// Delete a customer and its favorites. Returns `false` if none matched.
    async fn delete_customer(&self, id: RecordId) -> Result<bool, StoreError>;

    // =========================================================================
    // Products
    // =========================================================================

    /// Insert a product under a freshly generated id.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// All products in creation order.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: RecordId) -> Result<Option<Product>, StoreError>;

    async fn find_product_by_navigation_id(
        &self,
        navigation_id: &NavigationId,
    ) -> Result<Option<Product>, StoreError>;

    /// Apply a partial update. Returns `false` if no product matched.
    async fn update_product(&self, key: &ProductKey, patch: ProductPatch)
    -> Result<bool, StoreError>;

    /// Returns `false` if no product matched.
    async fn delete_product(&self, key: &ProductKey) -> Result<bool, StoreError>;

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Append a favorite to a customer.
    ///
    /// Fails with `NotFound` if the customer does not exist and `Conflict` if
    /// the navigation ID is already among its favorites.
    async fn add_favorite(&self, customer_id: RecordId, favorite: Favorite)
    -> Result<(), StoreError>;

    /// Favorites in insertion order, or `None` if the customer does not exist.
    async fn list_favorites(&self, customer_id: RecordId)
    -> Result<Option<Vec<Favorite>>, StoreError>;

    /// Returns `false` if the navigation ID was not among the favorites.
    async fn remove_favorite(
        &self,
        customer_id: RecordId,
        navigation_id: &NavigationId,
    ) -> Result<bool, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Build the store selected by configuration.
///
/// # Errors
///
/// Returns `StoreError::Config` if `PostgreSQL` is selected without a URL, or
/// `StoreError::Database` if the pool cannot connect.
pub async fn connect(config: &CatalogConfig) -> Result<Arc<dyn CatalogStore>, StoreError> {
    match config.store {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_ref()
                .ok_or_else(|| StoreError::Config("CATALOG_DATABASE_URL is not set".to_owned()))?;
            let pool = create_pool(url).await?;
            tracing::info!("Database pool created");
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Map a sqlx error to `Conflict` when it is a unique violation.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(format!("{what} already exists"));
    }
    StoreError::Database(e)
}
