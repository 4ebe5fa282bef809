//! Seed the catalog with products from a YAML file.
//!
//! The file is a list of product bodies, the same shape `POST /produtos`
//! accepts:
//!
//! ```yaml
//! - navigation_id: ABCDEFGHIJ
//!   title: Running shoe
//!   price: 199.90
//!   brand: Acme
//! ```
//!
//! Every entry is validated before the database is touched. Products whose
//! `navigation_id` already exists are skipped.

use std::path::Path;

use tracing::{error, info, warn};

use catalog_server::db::{self, CatalogStore, PgStore, StoreError};
use catalog_server::models::NewProduct;
use catalog_server::routes::products::CreateProductRequest;

use super::{CliError, database_url};

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse and validate a YAML product list.
///
/// Returns the products in file order.
///
/// # Errors
///
/// Returns `CliError::Yaml` if the file is not a list of product bodies, or
/// `CliError::InvalidEntries` after logging each entry that fails validation.
pub fn parse_products(content: &str) -> Result<Vec<NewProduct>, CliError> {
    let entries: Vec<CreateProductRequest> = serde_yaml::from_str(content)?;

    let mut products = Vec::with_capacity(entries.len());
    let mut invalid = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        match entry.validate() {
            Ok(product) => products.push(product),
            Err(e) => {
                error!(entry = index, "Invalid product: {e}");
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        return Err(CliError::InvalidEntries(invalid));
    }
    Ok(products)
}

/// Insert products into `store`, skipping existing navigation IDs.
///
/// # Errors
///
/// Returns `StoreError` for any failure other than a duplicate.
pub async fn insert_products(
    store: &dyn CatalogStore,
    products: Vec<NewProduct>,
) -> Result<SeedSummary, StoreError> {
    let mut summary = SeedSummary::default();

    for product in products {
        let navigation_id = product.navigation_id.clone();
        match store.insert_product(product).await {
            Ok(p) => {
                info!(product_id = %p.id, navigation_id = %navigation_id, "Inserted");
                summary.inserted += 1;
            }
            Err(StoreError::Conflict(_)) => {
                warn!(navigation_id = %navigation_id, "Already exists, skipping");
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

/// Seed products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or database operations fail.
pub async fn products(file_path: &str) -> Result<(), CliError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading products from file");

    // Read and validate before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_products(&content)?;
    info!(products = products.len(), "Parsed and validated");

    let pool = db::create_pool(&database_url()?).await?;
    info!("Connected to database");

    let store = PgStore::new(pool);
    let summary = insert_products(&store, products).await?;

    info!("Seeding complete!");
    info!("  Inserted: {}", summary.inserted);
    info!("  Skipped (already exist): {}", summary.skipped);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_server::db::MemoryStore;

    use super::*;

    const YAML: &str = "
- navigation_id: ABCDEFGHIJ
  title: Running shoe
  price: 199.90
  brand: Acme
- navigation_id: KLMNOPQRST
  nome: Sandália
  preco: 49
";

    #[test]
    fn test_parse_products() {
        let products = parse_products(YAML).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].title, "Sandália");
        assert_eq!(products[0].brand.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_invalid_entries_are_counted() {
        let yaml = "
- navigation_id: SHORT
  title: x
  price: 1
- title: no id
  price: 1
";
        assert!(matches!(
            parse_products(yaml),
            Err(CliError::InvalidEntries(2))
        ));
    }

    #[tokio::test]
    async fn test_reseeding_skips_existing() {
        let store = MemoryStore::new();

        let first = insert_products(&store, parse_products(YAML).unwrap())
            .await
            .unwrap();
        assert_eq!(first, SeedSummary { inserted: 2, skipped: 0 });

        let second = insert_products(&store, parse_products(YAML).unwrap())
            .await
            .unwrap();
        assert_eq!(second, SeedSummary { inserted: 0, skipped: 2 });
    }
}
