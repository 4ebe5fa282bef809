//! Product catalog lookups.

use catalog_core::NavigationId;

use crate::db::{CatalogStore, StoreError};
use crate::models::Favorite;

/// Resolves navigation IDs against the product store.
pub struct ProductCatalog<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> ProductCatalog<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    /// Snapshot of the product with `navigation_id`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the lookup fails.
    pub async fn snapshot(
        &self,
        navigation_id: &NavigationId,
    ) -> Result<Option<Favorite>, StoreError> {
        let product = self
            .store
            .find_product_by_navigation_id(navigation_id)
            .await?;
        Ok(product.as_ref().map(Favorite::from))
    }
}
