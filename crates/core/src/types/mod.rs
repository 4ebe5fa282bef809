//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

/// Implements `sqlx` `Type`, `Encode` and `Decode` for a type stored as `TEXT`.
///
/// Decoding goes through the given parser so that corrupt rows surface as
/// decode errors instead of invalid values.
macro_rules! pg_text_type {
    ($name:ty, $parse:expr) => {
        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(($parse)(s)?)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
            }
        }
    };
}

pub mod email;
pub mod id;
pub mod navigation;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{RecordId, RecordIdError};
pub use navigation::{NavigationId, NavigationIdError};
pub use price::{Price, PriceError};
