//! Integration tests for identifiers and hashing
//!
//! Tests the seeded hash, its stability, and identifier formatting.

use std::collections::HashSet;

use tessera_foundation::{ExternalId, HASH_SEED, hash_id};

// =============================================================================
// Hashing
// =============================================================================

#[test]
fn seed_is_fixed() {
    assert_eq!(HASH_SEED, 3637);
}

#[test]
fn hash_matches_seeded_xxh32_of_little_endian_bytes() {
    let id = ExternalId(123_456_789);
    let expected = xxhash_rust::xxh32::xxh32(&123_456_789_i64.to_le_bytes(), 3637);
    assert_eq!(hash_id(id).value(), expected);
}

#[test]
fn hash_is_deterministic() {
    for raw in [-1, 0, 1, i64::MAX, i64::MIN] {
        assert_eq!(hash_id(ExternalId(raw)), hash_id(ExternalId(raw)));
        assert_eq!(ExternalId(raw).hash_id(), hash_id(ExternalId(raw)));
    }
}

#[test]
fn sequential_ids_spread_out() {
    let hashes: HashSet<u32> = (0..1000).map(|raw| hash_id(ExternalId(raw)).value()).collect();
    assert_eq!(hashes.len(), 1000);
}

// =============================================================================
// Formatting
// =============================================================================

#[test]
fn display_is_the_raw_value() {
    assert_eq!(ExternalId(42).to_string(), "42");
    assert_eq!(format!("{:?}", ExternalId(42)), "ExternalId(42)");
}

#[test]
fn conversions() {
    let id: ExternalId = 7_i64.into();
    assert_eq!(id, ExternalId::new(7));
    assert_eq!(id.raw(), 7);
}
