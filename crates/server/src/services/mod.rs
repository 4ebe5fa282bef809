//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password hashing and customer login
//! - `catalog` - Product lookups used by the favorites resource

pub mod auth;
pub mod catalog;
