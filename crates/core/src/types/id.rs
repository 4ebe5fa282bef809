//! Opaque record identifiers.
//!
//! Every customer and product is identified by a [`RecordId`]: 12 bytes made of
//! a 4-byte big-endian unix timestamp, 5 random bytes fixed per process and a
//! 3-byte big-endian counter. On the wire it is always the 24-character
//! lowercase hex rendering, so the storage representation never leaks into the
//! API contract.

use core::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`RecordId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordIdError {
    /// The input does not have exactly 24 characters.
    #[error("id must be {expected} hex characters (got {len})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        len: usize,
    },
    /// The input contains a non-hex character.
    #[error("id must contain only hex characters")]
    InvalidHex,
}

/// A store-generated record identifier.
///
/// ## Examples
///
/// ```
/// use catalog_core::RecordId;
///
/// let id = RecordId::generate();
/// let parsed = RecordId::parse(&id.to_string()).unwrap();
/// assert_eq!(id, parsed);
///
/// assert!(RecordId::parse("not-an-id").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId([u8; RecordId::BYTES]);

static PROCESS_NONCE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

impl RecordId {
    /// Size of the binary id.
    pub const BYTES: usize = 12;

    /// Length of the hex rendering.
    pub const HEX_LENGTH: usize = Self::BYTES * 2;

    /// Generate a new, process-unique id.
    #[must_use]
    pub fn generate() -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let seconds = chrono::Utc::now().timestamp().max(0) as u32;
        let nonce = PROCESS_NONCE.get_or_init(rand::random::<[u8; 5]>);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;

        let mut bytes = [0_u8; Self::BYTES];
        let (time_part, rest) = bytes.split_at_mut(4);
        let (nonce_part, counter_part) = rest.split_at_mut(5);
        time_part.copy_from_slice(&seconds.to_be_bytes());
        nonce_part.copy_from_slice(nonce);
        counter_part.copy_from_slice(&count.to_be_bytes()[1..]);

        Self(bytes)
    }

    /// Parse an id from its hex rendering (either case).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 hex characters.
    pub fn parse(s: &str) -> Result<Self, RecordIdError> {
        if s.len() != Self::HEX_LENGTH {
            return Err(RecordIdError::InvalidLength {
                expected: Self::HEX_LENGTH,
                len: s.chars().count(),
            });
        }

        let mut bytes = [0_u8; Self::BYTES];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| RecordIdError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Seconds since the unix epoch at which the id was generated.
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl std::str::FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

pg_text_type!(RecordId, RecordId::parse);
