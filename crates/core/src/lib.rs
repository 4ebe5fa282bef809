//! Catalog Core - Shared types library.
//!
//! This crate provides the value types used across all catalog components:
//! - `server` - HTTP API for customers, products and favorites
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. The optional `postgres` feature adds `sqlx` encoding so the
//! same types can be bound and decoded directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for record IDs, navigation IDs, emails and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
