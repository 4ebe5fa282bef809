//! Product domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use catalog_core::{NavigationId, Price, RecordId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Store-generated identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Unique application-level identifier.
    pub navigation_id: NavigationId,
    pub title: String,
    pub price: Price,
    pub description: Option<String>,
    /// Image URL.
    pub image: Option<String>,
    pub brand: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub review_score: Option<Decimal>,
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub navigation_id: NavigationId,
    pub title: String,
    pub price: Price,
    pub description: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub review_score: Option<Decimal>,
}

impl NewProduct {
    /// Attach a store-generated id.
    #[must_use]
    pub fn into_product(self, id: RecordId) -> Product {
        Product {
            id,
            navigation_id: self.navigation_id,
            title: self.title,
            price: self.price,
            description: self.description,
            image: self.image,
            brand: self.brand,
            review_score: self.review_score,
        }
    }
}

/// A partial update restricted to the product allow-list.
///
/// The navigation ID is not updatable.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub review_score: Option<Decimal>,
}

impl ProductPatch {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.brand.is_none()
            && self.review_score.is_none()
    }

    /// Apply the patch in place.
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if self.description.is_some() {
            product.description = self.description;
        }
        if self.image.is_some() {
            product.image = self.image;
        }
        if self.brand.is_some() {
            product.brand = self.brand;
        }
        if self.review_score.is_some() {
            product.review_score = self.review_score;
        }
    }
}

/// Error returned when a path segment is neither kind of product key.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' is neither a 24-character id nor a 10-character navigation_id")]
pub struct ProductKeyError(pub String);

/// Addresses a single product by either of its unique keys.
///
/// The two formats cannot collide: record IDs are 24 characters, navigation IDs
/// are 10.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKey {
    Id(RecordId),
    NavigationId(NavigationId),
}

impl ProductKey {
    /// Parse a key from a path segment.
    ///
    /// # Errors
    ///
    /// Returns `ProductKeyError` if the segment matches neither format.
    pub fn parse(s: &str) -> Result<Self, ProductKeyError> {
        if s.len() == RecordId::HEX_LENGTH {
            return RecordId::parse(s)
                .map(Self::Id)
                .map_err(|_| ProductKeyError(s.to_owned()));
        }
        NavigationId::parse(s)
            .map(Self::NavigationId)
            .map_err(|_| ProductKeyError(s.to_owned()))
    }

    /// Returns true if `product` is the one addressed by this key.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Id(id) => product.id == *id,
            Self::NavigationId(nav) => product.navigation_id == *nav,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        NewProduct {
            navigation_id: NavigationId::parse("ABCDEFGHIJ").unwrap(),
            title: "Shoe".to_string(),
            price: Price::new(Decimal::new(10, 0)).unwrap(),
            description: Some("d".to_string()),
            image: None,
            brand: None,
            review_score: None,
        }
        .into_product(RecordId::generate())
    }

    #[test]
    fn test_product_key_parse() {
        let id = RecordId::generate();
        assert_eq!(
            ProductKey::parse(&id.to_string()).unwrap(),
            ProductKey::Id(id)
        );
        assert!(matches!(
            ProductKey::parse("ABCDEFGHIJ").unwrap(),
            ProductKey::NavigationId(_)
        ));
        assert!(ProductKey::parse("short").is_err());
        assert!(ProductKey::parse("gggggggggggggggggggggggg").is_err());
    }

    #[test]
    fn test_product_key_matches() {
        let p = product();
        assert!(ProductKey::Id(p.id).matches(&p));
        assert!(ProductKey::parse("ABCDEFGHIJ").unwrap().matches(&p));
        assert!(!ProductKey::parse("ZZZZZZZZZZ").unwrap().matches(&p));
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(product()).unwrap();
        assert_eq!(json["navigation_id"], "ABCDEFGHIJ");
        assert_eq!(json["title"], "Shoe");
        assert_eq!(json["price"], 10.0);
        assert!(json["review_score"].is_null());
    }

    #[test]
    fn test_patch_keeps_unsupplied_fields() {
        let mut p = product();
        ProductPatch {
            brand: Some("b".to_string()),
            ..ProductPatch::default()
        }
        .apply(&mut p);
        assert_eq!(p.brand.as_deref(), Some("b"));
        assert_eq!(p.description.as_deref(), Some("d"));
        assert_eq!(p.title, "Shoe");
    }
}
