//! Product navigation identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`NavigationId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationIdError {
    /// The input string is empty.
    #[error("navigation_id cannot be empty")]
    Empty,
    /// The input does not have exactly ten characters.
    #[error("navigation_id must be exactly {expected} characters (got {len})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input, in characters.
        len: usize,
    },
    /// The input contains something other than ASCII letters and digits.
    #[error("navigation_id must be alphanumeric (found {found:?})")]
    InvalidCharacter {
        /// First offending character.
        found: char,
    },
}

/// Application-level product identifier.
///
/// Distinct from the store-generated [`RecordId`](crate::RecordId): clients use it
/// to look products up and to reference them from favorites. Exactly ten ASCII
/// letters or digits, case-sensitive.
///
/// ## Examples
///
/// ```
/// use catalog_core::NavigationId;
///
/// assert!(NavigationId::parse("ABCDEFGHIJ").is_ok());
/// assert!(NavigationId::parse("ABCDEFGHI").is_err());   // 9 characters
/// assert!(NavigationId::parse("ABCDE-GHIJ").is_err());  // hyphen
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NavigationId(String);

impl NavigationId {
    /// Required length of a navigation ID.
    pub const LENGTH: usize = 10;

    /// Parse a `NavigationId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly ten ASCII alphanumeric
    /// characters.
    pub fn parse(s: &str) -> Result<Self, NavigationIdError> {
        if s.is_empty() {
            return Err(NavigationIdError::Empty);
        }

        if let Some(found) = s.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(NavigationIdError::InvalidCharacter { found });
        }

        // Only ASCII remains, so bytes == chars.
        if s.len() != Self::LENGTH {
            return Err(NavigationIdError::InvalidLength {
                expected: Self::LENGTH,
                len: s.len(),
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the navigation ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for NavigationId {
    type Err = NavigationIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NavigationId {
    type Error = NavigationIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NavigationId> for String {
    fn from(id: NavigationId) -> Self {
        id.0
    }
}

impl AsRef<str> for NavigationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pg_text_type!(NavigationId, NavigationId::parse);
