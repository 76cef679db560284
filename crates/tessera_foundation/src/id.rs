//! External identifiers and their seeded hashes.
//!
//! Every entity mirrored from the remote service carries a fixed-width
//! signed integer identifier. Indices never hash an identifier themselves;
//! callers compute [`IdHash`] once (usually while decoding) and pass it
//! alongside the key.

use std::fmt;

use xxhash_rust::xxh32::xxh32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seed for [`hash_id`].
///
/// Fixed for the whole process so a hash computed once can be cached on a
/// record and compared later. Hash values are not meant to be persisted.
pub const HASH_SEED: u32 = 3637;

/// Identifier assigned to an entity by the remote service.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExternalId(pub i64);

impl ExternalId {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Computes the seeded hash of this identifier.
    #[must_use]
    pub fn hash_id(self) -> IdHash {
        hash_id(self)
    }
}

impl From<i64> for ExternalId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalId({})", self.0)
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Precomputed hash of an [`ExternalId`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdHash(pub u32);

impl IdHash {
    /// Returns the raw 32-bit hash value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for IdHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdHash({:#010x})", self.0)
    }
}

/// Hashes an identifier with XXH32 over its little-endian bytes.
#[must_use]
pub fn hash_id(id: ExternalId) -> IdHash {
    IdHash(xxh32(&id.0.to_le_bytes(), HASH_SEED))
}
