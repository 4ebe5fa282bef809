//! Customer domain types.

use serde::Serialize;

use catalog_core::{Email, RecordId};

/// A catalog customer.
///
/// Serializes to the public wire shape; the password hash is never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Store-generated identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Display name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Unique email address.
    pub email: Email,
    /// Optional phone number, free-form.
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    /// Argon2 PHC string, if the customer registered with a password.
    #[serde(skip)]
    pub password_hash: Option<String>,
}

/// A validated customer ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

impl NewCustomer {
    /// Attach a store-generated id.
    #[must_use]
    pub fn into_customer(self, id: RecordId) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
        }
    }
}

/// A partial update restricted to the customer allow-list.
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

impl CustomerPatch {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.password_hash.is_none()
    }

    /// Apply the patch in place.
    pub fn apply(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        if let Some(phone) = self.phone {
            customer.phone = Some(phone);
        }
        if let Some(hash) = self.password_hash {
            customer.password_hash = Some(hash);
        }
    }
}
