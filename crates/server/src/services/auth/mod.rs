//! Authentication service.
//!
//! Stateless password login: a successful check issues no session or token.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use catalog_core::Email;

use crate::db::CatalogStore;
use crate::models::Customer;

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    /// Check a customer's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CustomerNotFound` if no customer has `email`.
    /// Returns `AuthError::InvalidCredentials` if the customer has no password
    /// or `password` does not match.
    pub async fn login(&self, email: &Email, password: &str) -> Result<Customer, AuthError> {
        let customer = self
            .store
            .find_customer_by_email(email)
            .await?
            .ok_or(AuthError::CustomerNotFound)?;

        let hash = customer
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        verify_password(password, hash)?;

        Ok(customer)
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::db::MemoryStore;
    use crate::models::NewCustomer;

    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_outcomes() {
        let store = MemoryStore::new();
        let email = Email::parse("ana@x.com").unwrap();
        store
            .insert_customer(NewCustomer {
                name: "Ana".to_string(),
                email: email.clone(),
                phone: None,
                password_hash: Some(hash_password("s3cret").unwrap()),
            })
            .await
            .unwrap();
        store
            .insert_customer(NewCustomer {
                name: "Bia".to_string(),
                email: Email::parse("bia@x.com").unwrap(),
                phone: None,
                password_hash: None,
            })
            .await
            .unwrap();

        let auth = AuthService::new(&store);
        assert_eq!(auth.login(&email, "s3cret").await.unwrap().name, "Ana");
        assert!(matches!(
            auth.login(&email, "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login(&Email::parse("bia@x.com").unwrap(), "x").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login(&Email::parse("zed@x.com").unwrap(), "x").await,
            Err(AuthError::CustomerNotFound)
        ));
    }
}
