//! Integration tests for the identifier index
//!
//! Tests round trips, replacement, growth triggers, and tier transitions.

use std::collections::HashMap;

use tessera_foundation::{ExternalId, hash_id};
use tessera_storage::{CAPACITY_TIERS, IdIndex, InsertOutcome};

fn insert(index: &mut IdIndex<ExternalId, u32>, raw: i64, payload: u32) -> InsertOutcome {
    let id = ExternalId(raw);
    index.insert(id, hash_id(id), payload)
}

fn get(index: &IdIndex<ExternalId, u32>, raw: i64) -> Option<u32> {
    let id = ExternalId(raw);
    index.get(&id, hash_id(id)).copied()
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn round_trip_many_keys() {
    let mut index = IdIndex::new();
    for raw in 0..5_000 {
        insert(&mut index, raw * 31, raw as u32);
    }
    for raw in 0..5_000 {
        assert_eq!(get(&index, raw * 31), Some(raw as u32));
    }
    assert_eq!(index.len(), 5_000);
}

#[test]
fn replacement_keeps_one_entry() {
    let mut index = IdIndex::new();
    assert_eq!(insert(&mut index, 9, 1), InsertOutcome::Inserted);
    assert_eq!(insert(&mut index, 9, 2), InsertOutcome::Replaced);
    assert_eq!(get(&index, 9), Some(2));
    assert_eq!(index.len(), 1);
    assert_eq!(index.iter().count(), 1);
}

// =============================================================================
// Growth
// =============================================================================

#[test]
fn growth_trigger_at_max_entries_plus_one() {
    let mut index = IdIndex::new();
    let first = CAPACITY_TIERS[0];

    for raw in 0..i64::from(first.max_entries) {
        insert(&mut index, raw, 0);
    }
    assert_eq!(index.tier(), 0);
    assert_eq!(index.capacity(), first.capacity as usize);

    insert(&mut index, 1_000, 0);
    assert_eq!(index.tier(), 1);
    assert_eq!(index.capacity(), CAPACITY_TIERS[1].capacity as usize);

    for raw in 0..i64::from(first.max_entries) {
        assert_eq!(get(&index, raw), Some(0));
    }
    assert_eq!(get(&index, 1_000), Some(0));
}

#[test]
fn no_false_positives_across_tier_transitions() {
    let mut index = IdIndex::new();
    let mut model = HashMap::new();

    for raw in 0..300 {
        insert(&mut index, raw * 2, raw as u32);
        model.insert(raw * 2, raw as u32);

        // Odd ids were never inserted
        assert_eq!(get(&index, raw * 2 + 1), None);
    }
    for (raw, payload) in model {
        assert_eq!(get(&index, raw), Some(payload));
    }
}

#[test]
fn presized_index_skips_growth() {
    let mut index = IdIndex::with_capacity_for(1_000);
    let tier = index.tier();
    for raw in 0..1_000 {
        insert(&mut index, raw, 0);
    }
    assert_eq!(index.tier(), tier);
    assert!(index.max_entries() >= 1_000);
}

#[test]
fn clear_returns_to_smallest_tier() {
    let mut index = IdIndex::new();
    for raw in 0..100 {
        insert(&mut index, raw, 0);
    }
    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.tier(), 0);
    assert_eq!(get(&index, 1), None);
}
