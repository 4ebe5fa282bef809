//! Domain models for the catalog.
//!
//! These types are validated domain objects, separate from the database row
//! types in [`crate::db`] and the request bodies in [`crate::routes`].

pub mod customer;
pub mod favorite;
pub mod product;

pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use favorite::Favorite;
pub use product::{NewProduct, Product, ProductKey, ProductPatch};
