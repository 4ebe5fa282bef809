//! Favorite snapshots.

use rust_decimal::Decimal;
use serde::Serialize;

use catalog_core::{NavigationId, Price};

use super::Product;

/// A product a customer marked as favorite.
///
/// Captured when the favorite is added and never refreshed: later edits or
/// deletion of the product leave it as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub navigation_id: NavigationId,
    pub title: String,
    pub price: Price,
    pub image: Option<String>,
    pub brand: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub review_score: Option<Decimal>,
}

impl From<&Product> for Favorite {
    fn from(product: &Product) -> Self {
        Self {
            navigation_id: product.navigation_id.clone(),
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            brand: product.brand.clone(),
            review_score: product.review_score,
        }
    }
}
