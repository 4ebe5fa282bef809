//! Process-local store.
//!
//! Keeps customers (with their embedded favorites) and products in insertion
//! order behind a single `RwLock`. Uniqueness checks run under the write lock,
//! so they are atomic with the insert they guard.

use async_trait::async_trait;
use tokio::sync::RwLock;

use catalog_core::{Email, NavigationId, RecordId};

use super::{CatalogStore, StoreError};
use crate::models::{
    Customer, CustomerPatch, Favorite, NewCustomer, NewProduct, Product, ProductKey, ProductPatch,
};

#[derive(Debug)]
struct CustomerDocument {
    customer: Customer,
    favorites: Vec<Favorite>,
}

#[derive(Debug, Default)]
struct Collections {
    customers: Vec<CustomerDocument>,
    products: Vec<Product>,
}

impl Collections {
    fn customer_mut(&mut self, id: RecordId) -> Option<&mut CustomerDocument> {
        self.customers.iter_mut().find(|doc| doc.customer.id == id)
    }

    fn email_taken(&self, email: &Email, except: Option<RecordId>) -> bool {
        self.customers
            .iter()
            .any(|doc| doc.customer.email == *email && Some(doc.customer.id) != except)
    }
}

/// In-memory [`CatalogStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&customer.email, None) {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }

        let customer = customer.into_customer(RecordId::generate());
        inner.customers.push(CustomerDocument {
            customer: customer.clone(),
            favorites: Vec::new(),
        });
        Ok(customer)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .customers
            .iter()
            .map(|doc| doc.customer.clone())
            .collect())
    }

    async fn get_customer(&self, id: RecordId) -> Result<Option<Customer>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .customers
            .iter()
            .find(|doc| doc.customer.id == id)
            .map(|doc| doc.customer.clone()))
    }

    async fn find_customer_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Customer>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .customers
            .iter()
            .find(|doc| doc.customer.email == *email)
            .map(|doc| doc.customer.clone()))
    }

    async fn update_customer(
        &self,
        id: RecordId,
        patch: CustomerPatch,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.customers.iter().any(|doc| doc.customer.id == id) {
            return Ok(false);
        }
        if let Some(email) = &patch.email
            && inner.email_taken(email, Some(id))
        {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }

        let Some(doc) = inner.customer_mut(id) else {
            return Ok(false);
        };
        patch.apply(&mut doc.customer);
        Ok(true)
    }

    async fn delete_customer(&self, id: RecordId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.customers.len();
        inner.customers.retain(|doc| doc.customer.id != id);
        Ok(inner.customers.len() != before)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .products
            .iter()
            .any(|p| p.navigation_id == product.navigation_id)
        {
            return Err(StoreError::Conflict(
                "navigation_id already exists".to_owned(),
            ));
        }

        let product = product.into_product(RecordId::generate());
        inner.products.push(product.clone());
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.inner.read().await.products.clone())
    }

    async fn get_product(&self, id: RecordId) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_by_navigation_id(
        &self,
        navigation_id: &NavigationId,
    ) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .iter()
            .find(|p| p.navigation_id == *navigation_id)
            .cloned())
    }

    async fn update_product(
        &self,
        key: &ProductKey,
        patch: ProductPatch,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(product) = inner.products.iter_mut().find(|p| key.matches(p)) else {
            return Ok(false);
        };
        patch.apply(product);
        Ok(true)
    }

    async fn delete_product(&self, key: &ProductKey) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.products.len();
        inner.products.retain(|p| !key.matches(p));
        Ok(inner.products.len() != before)
    }

    async fn add_favorite(
        &self,
        customer_id: RecordId,
        favorite: Favorite,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner.customer_mut(customer_id).ok_or(StoreError::NotFound)?;
        if doc
            .favorites
            .iter()
            .any(|f| f.navigation_id == favorite.navigation_id)
        {
            return Err(StoreError::Conflict("favorite already exists".to_owned()));
        }
        doc.favorites.push(favorite);
        Ok(())
    }

    async fn list_favorites(
        &self,
        customer_id: RecordId,
    ) -> Result<Option<Vec<Favorite>>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .customers
            .iter()
            .find(|doc| doc.customer.id == customer_id)
            .map(|doc| doc.favorites.clone()))
    }

    async fn remove_favorite(
        &self,
        customer_id: RecordId,
        navigation_id: &NavigationId,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner.customer_mut(customer_id).ok_or(StoreError::NotFound)?;
        let before = doc.favorites.len();
        doc.favorites.retain(|f| f.navigation_id != *navigation_id);
        Ok(doc.favorites.len() != before)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use catalog_core::Price;

    use super::*;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            name: "Ana".to_string(),
            email: Email::parse(email).unwrap(),
            phone: None,
            password_hash: None,
        }
    }

    fn new_product(nav: &str) -> NewProduct {
        NewProduct {
            navigation_id: NavigationId::parse(nav).unwrap(),
            title: "Shoe".to_string(),
            price: Price::new(Decimal::new(10, 0)).unwrap(),
            description: None,
            image: None,
            brand: None,
            review_score: None,
        }
    }

    #[tokio::test]
    async fn test_customers_keep_insertion_order() {
        let store = MemoryStore::new();
        let a = store.insert_customer(new_customer("a@x.com")).await.unwrap();
        let b = store.insert_customer(new_customer("b@x.com")).await.unwrap();

        let ids: Vec<_> = store
            .list_customers()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.insert_customer(new_customer("a@x.com")).await.unwrap();
        let err = store
            .insert_customer(new_customer("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_email_to_taken_conflicts() {
        let store = MemoryStore::new();
        store.insert_customer(new_customer("a@x.com")).await.unwrap();
        let b = store.insert_customer(new_customer("b@x.com")).await.unwrap();

        let patch = CustomerPatch {
            email: Some(Email::parse("a@x.com").unwrap()),
            ..CustomerPatch::default()
        };
        let err = store.update_customer(b.id, patch).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Re-saving your own email is fine.
        let patch = CustomerPatch {
            email: Some(Email::parse("b@x.com").unwrap()),
            ..CustomerPatch::default()
        };
        assert!(store.update_customer(b.id, patch).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_customer() {
        let store = MemoryStore::new();
        let id = RecordId::generate();
        let patch = CustomerPatch {
            name: Some("X".to_string()),
            ..CustomerPatch::default()
        };
        assert!(!store.update_customer(id, patch).await.unwrap());
        assert!(!store.delete_customer(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_customer_with_taken_email() {
        let store = MemoryStore::new();
        store.insert_customer(new_customer("a@x.com")).await.unwrap();

        let patch = CustomerPatch {
            email: Some(Email::parse("a@x.com").unwrap()),
            ..CustomerPatch::default()
        };
        assert!(
            !store
                .update_customer(RecordId::generate(), patch)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_product_addressed_by_either_key() {
        let store = MemoryStore::new();
        let p = store.insert_product(new_product("ABCDEFGHIJ")).await.unwrap();

        let patch = ProductPatch {
            title: Some("Boot".to_string()),
            ..ProductPatch::default()
        };
        assert!(
            store
                .update_product(&ProductKey::Id(p.id), patch)
                .await
                .unwrap()
        );

        let key = ProductKey::NavigationId(p.navigation_id.clone());
        let found = store
            .find_product_by_navigation_id(&p.navigation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.title, "Boot");

        assert!(store.delete_product(&key).await.unwrap());
        assert!(!store.delete_product(&key).await.unwrap());
        assert!(store.get_product(p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_navigation_id_conflicts() {
        let store = MemoryStore::new();
        store.insert_product(new_product("ABCDEFGHIJ")).await.unwrap();
        let err = store
            .insert_product(new_product("ABCDEFGHIJ"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_favorites_lifecycle() {
        let store = MemoryStore::new();
        let c = store.insert_customer(new_customer("a@x.com")).await.unwrap();
        let p = store.insert_product(new_product("ABCDEFGHIJ")).await.unwrap();
        let favorite = Favorite::from(&p);

        store.add_favorite(c.id, favorite.clone()).await.unwrap();
        let err = store.add_favorite(c.id, favorite.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let listed = store.list_favorites(c.id).await.unwrap().unwrap();
        assert_eq!(listed, vec![favorite.clone()]);

        assert!(store.remove_favorite(c.id, &p.navigation_id).await.unwrap());
        assert!(!store.remove_favorite(c.id, &p.navigation_id).await.unwrap());
        assert!(store.list_favorites(c.id).await.unwrap().unwrap().is_empty());

        store.add_favorite(c.id, favorite).await.unwrap();
    }

    #[tokio::test]
    async fn test_favorites_of_missing_customer() {
        let store = MemoryStore::new();
        let p = store.insert_product(new_product("ABCDEFGHIJ")).await.unwrap();
        let id = RecordId::generate();

        assert!(matches!(
            store.add_favorite(id, Favorite::from(&p)).await,
            Err(StoreError::NotFound)
        ));
        assert!(store.list_favorites(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_favorite_snapshot_survives_product_edit() {
        let store = MemoryStore::new();
        let c = store.insert_customer(new_customer("a@x.com")).await.unwrap();
        let p = store.insert_product(new_product("ABCDEFGHIJ")).await.unwrap();
        store.add_favorite(c.id, Favorite::from(&p)).await.unwrap();

        let patch = ProductPatch {
            title: Some("Renamed".to_string()),
            ..ProductPatch::default()
        };
        store
            .update_product(&ProductKey::Id(p.id), patch)
            .await
            .unwrap();

        let listed = store.list_favorites(c.id).await.unwrap().unwrap();
        assert_eq!(listed.first().unwrap().title, "Shoe");
    }
}
