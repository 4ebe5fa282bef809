//! `PostgreSQL` store.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database. Ids, emails and navigation ids are bound and
//! decoded as their `catalog_core` types; a stored value that fails to parse
//! surfaces as a decode error. Prices are checked after decoding and reported
//! as [`StoreError::DataCorruption`].

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, postgres::PgArguments, query::Query};

use catalog_core::{Email, NavigationId, Price, RecordId};

use super::{CatalogStore, StoreError, conflict_on_unique};
use crate::models::{
    Customer, CustomerPatch, Favorite, NewCustomer, NewProduct, Product, ProductKey, ProductPatch,
};

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, password_hash";
const PRODUCT_COLUMNS: &str =
    "id, navigation_id, title, price, description, image, brand, review_score";

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: RecordId,
    name: String,
    email: Email,
    phone: Option<String>,
    password_hash: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            password_hash: row.password_hash,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: RecordId,
    navigation_id: NavigationId,
    title: String,
    price: Decimal,
    description: Option<String>,
    image: Option<String>,
    brand: Option<String>,
    review_score: Option<Decimal>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            navigation_id: row.navigation_id,
            title: row.title,
            price: parse_price(row.price)?,
            description: row.description,
            image: row.image,
            brand: row.brand,
            review_score: row.review_score,
        })
    }
}

#[derive(Debug, FromRow)]
struct FavoriteRow {
    navigation_id: NavigationId,
    title: String,
    price: Decimal,
    image: Option<String>,
    brand: Option<String>,
    review_score: Option<Decimal>,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = StoreError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            navigation_id: row.navigation_id,
            title: row.title,
            price: parse_price(row.price)?,
            image: row.image,
            brand: row.brand,
            review_score: row.review_score,
        })
    }
}

fn parse_price(raw: Decimal) -> Result<Price, StoreError> {
    Price::new(raw).map_err(|e| StoreError::DataCorruption(format!("invalid price in database: {e}")))
}

/// Column addressing a single product.
const fn product_key_column(key: &ProductKey) -> &'static str {
    match key {
        ProductKey::Id(_) => "id",
        ProductKey::NavigationId(_) => "navigation_id",
    }
}

/// Bind the value matching [`product_key_column`].
fn bind_product_key<'q>(
    query: Query<'q, Postgres, PgArguments>,
    key: &'q ProductKey,
) -> Query<'q, Postgres, PgArguments> {
    match key {
        ProductKey::Id(id) => query.bind(*id),
        ProductKey::NavigationId(nav) => query.bind(nav),
    }
}

/// [`CatalogStore`] backed by the `catalog` schema.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn customer_exists(&self, id: RecordId) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM catalog.customer WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // Customers
    // =========================================================================

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let customer = customer.into_customer(RecordId::generate());
        sqlx::query(
            r"
            INSERT INTO catalog.customer (id, name, email, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.phone.as_deref())
        .bind(customer.password_hash.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        Ok(customer)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM catalog.customer ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: RecordId) -> Result<Option<Customer>, StoreError> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM catalog.customer WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_customer_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Customer>, StoreError> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM catalog.customer WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn update_customer(
        &self,
        id: RecordId,
        patch: CustomerPatch,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE catalog.customer
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.phone)
        .bind(patch.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_customer(&self, id: RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM catalog.customer WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Products
    // =========================================================================

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = product.into_product(RecordId::generate());
        sqlx::query(
            r"
            INSERT INTO catalog.product
                (id, navigation_id, title, price, description, image, brand, review_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(product.id)
        .bind(&product.navigation_id)
        .bind(&product.title)
        .bind(product.price.amount())
        .bind(product.description.as_deref())
        .bind(product.image.as_deref())
        .bind(product.brand.as_deref())
        .bind(product.review_score)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "navigation_id"))?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get_product(&self, id: RecordId) -> Result<Option<Product>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn find_product_by_navigation_id(
        &self,
        navigation_id: &NavigationId,
    ) -> Result<Option<Product>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE navigation_id = $1"
        ))
        .bind(navigation_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn update_product(
        &self,
        key: &ProductKey,
        patch: ProductPatch,
    ) -> Result<bool, StoreError> {
        let sql = format!(
            r"
            UPDATE catalog.product
            SET title = COALESCE($2, title),
                price = COALESCE($3, price),
                description = COALESCE($4, description),
                image = COALESCE($5, image),
                brand = COALESCE($6, brand),
                review_score = COALESCE($7, review_score),
                updated_at = NOW()
            WHERE {} = $1
            ",
            product_key_column(key)
        );
        let result = bind_product_key(sqlx::query(&sql), key)
            .bind(patch.title)
            .bind(patch.price.map(Price::amount))
            .bind(patch.description)
            .bind(patch.image)
            .bind(patch.brand)
            .bind(patch.review_score)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, key: &ProductKey) -> Result<bool, StoreError> {
        let sql = format!(
            "DELETE FROM catalog.product WHERE {} = $1",
            product_key_column(key)
        );
        let result = bind_product_key(sqlx::query(&sql), key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    async fn add_favorite(
        &self,
        customer_id: RecordId,
        favorite: Favorite,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO catalog.favorite
                (customer_id, navigation_id, title, price, image, brand, review_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(customer_id)
        .bind(&favorite.navigation_id)
        .bind(&favorite.title)
        .bind(favorite.price.amount())
        .bind(favorite.image.as_deref())
        .bind(favorite.brand.as_deref())
        .bind(favorite.review_score)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return StoreError::NotFound;
            }
            conflict_on_unique(e, "favorite")
        })?;

        Ok(())
    }

    async fn list_favorites(
        &self,
        customer_id: RecordId,
    ) -> Result<Option<Vec<Favorite>>, StoreError> {
        if !self.customer_exists(customer_id).await? {
            return Ok(None);
        }

        let rows: Vec<FavoriteRow> = sqlx::query_as(
            r"
            SELECT navigation_id, title, price, image, brand, review_score
            FROM catalog.favorite
            WHERE customer_id = $1
            ORDER BY seq
            ",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Favorite::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    async fn remove_favorite(
        &self,
        customer_id: RecordId,
        navigation_id: &NavigationId,
    ) -> Result<bool, StoreError> {
        if !self.customer_exists(customer_id).await? {
            return Err(StoreError::NotFound);
        }

        let result = sqlx::query(
            "DELETE FROM catalog.favorite WHERE customer_id = $1 AND navigation_id = $2",
        )
        .bind(customer_id)
        .bind(navigation_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
