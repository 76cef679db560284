//! Integration tests for growable arenas
//!
//! Tests growth policy, pass reuse, and content preservation.

use tessera_storage::Arena;

// =============================================================================
// Growth
// =============================================================================

#[test]
fn growth_keeps_earlier_writes() {
    let mut arena: Arena<u64> = Arena::with_initial_capacity(2);
    let mut expected = Vec::new();

    for round in 0..20u64 {
        let start = arena.reserve(3);
        for i in 0..3 {
            let value = round * 10 + i;
            arena.as_mut_slice()[start + i as usize] = value;
            expected.push(value);
        }
    }

    assert_eq!(arena.as_slice(), expected.as_slice());
    assert!(arena.len() <= arena.capacity());
}

#[test]
fn growth_sequence() {
    let mut arena: Arena<u8> = Arena::with_initial_capacity(4);
    let mut seen = Vec::new();
    for _ in 0..20 {
        arena.reserve(1);
        if seen.last() != Some(&arena.capacity()) {
            seen.push(arena.capacity());
        }
    }
    assert_eq!(seen, vec![4, 8, 16, 32]);
}

// =============================================================================
// Pass Reuse
// =============================================================================

#[test]
fn soft_reset_reuses_allocation() {
    let mut arena: Arena<u32> = Arena::new();
    arena.reserve(100);
    let capacity = arena.capacity();

    arena.soft_reset();
    arena.reserve(100);

    assert_eq!(arena.capacity(), capacity);
    assert_eq!(arena.len(), 100);
}

#[test]
fn reserved_slots_are_default() {
    let mut arena: Arena<Option<u32>> = Arena::new();
    arena.push(Some(1));
    arena.soft_reset();
    let start = arena.reserve(2);
    assert_eq!(&arena.as_slice()[start..], &[None, None]);
}
