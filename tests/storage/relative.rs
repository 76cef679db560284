//! Integration tests for relative references
//!
//! Tests survival across growth and detection of stale or foreign references.

use tessera_foundation::ErrorKind;
use tessera_storage::Arena;

// =============================================================================
// Auxiliary Arena Stability
// =============================================================================

#[test]
fn slices_of_one_five_one_survive_growth() {
    let mut arena: Arena<u32> = Arena::with_initial_capacity(1);

    let a = arena.reserve_relative(1);
    *a.resolve_mut(&mut arena).unwrap() = 11;

    let b = arena.reserve_relative(5);
    for (i, slot) in b.resolve_slice_mut(&mut arena).unwrap().iter_mut().enumerate() {
        *slot = 20 + i as u32;
    }

    let c = arena.reserve_relative(1);
    *c.resolve_mut(&mut arena).unwrap() = 31;

    assert_eq!(a.resolve_slice(&arena).unwrap(), &[11]);
    assert_eq!(b.resolve_slice(&arena).unwrap(), &[20, 21, 22, 23, 24]);
    assert_eq!(c.resolve_slice(&arena).unwrap(), &[31]);
    assert_eq!((a.offset(), b.offset(), c.offset()), (0, 1, 6));
}

#[test]
fn reference_reads_current_storage() {
    let mut arena: Arena<u32> = Arena::new();
    let r = arena.reserve_relative(1);
    *r.resolve_mut(&mut arena).unwrap() = 1;
    arena.as_mut_slice()[0] = 2;
    assert_eq!(*r.resolve(&arena).unwrap(), 2);
}

// =============================================================================
// Misuse Detection
// =============================================================================

#[test]
fn stale_after_soft_reset() {
    let mut arena: Arena<u32> = Arena::new();
    let r = arena.reserve_relative(2);
    arena.soft_reset();
    arena.reserve(2);

    let err = r.resolve_slice(&arena).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaleReference { .. }));
}

#[test]
fn foreign_arena_rejected_even_with_same_layout() {
    let mut a: Arena<u32> = Arena::new();
    let mut b: Arena<u32> = Arena::new();
    let r = a.reserve_relative(3);
    b.reserve(3);

    assert!(r.is_valid_in(&a));
    assert!(!r.is_valid_in(&b));
}
