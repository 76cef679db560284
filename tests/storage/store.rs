//! Integration tests for entity stores
//!
//! Tests the population scenarios every domain store relies on.

use tessera_foundation::{ExternalId, StoreConfig};
use tessera_storage::{Arena, Entity, EntityStore, InsertOutcome, RelativeRef};

#[derive(Debug)]
struct Item {
    id: ExternalId,
    tags: RelativeRef<u32>,
}

impl Entity for Item {
    fn id(&self) -> ExternalId {
        self.id
    }
}

fn populate(store: &mut EntityStore<Item>, tags: &mut Arena<u32>, ids: &[i64]) {
    store.begin_pass(ids.len());
    tags.soft_reset();
    for &raw in ids {
        let slice = tags.reserve_relative(2);
        for slot in slice.resolve_slice_mut(tags).unwrap() {
            *slot = raw as u32;
        }
        store
            .insert(Item {
                id: ExternalId(raw),
                tags: slice,
            })
            .unwrap();
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn basic_store_lookup() {
    let mut store = EntityStore::new();
    let mut tags = Arena::new();
    populate(&mut store, &mut tags, &[10, 20, 30]);

    let found = store.lookup(ExternalId(20)).unwrap();
    assert_eq!(found.id, ExternalId(20));
    assert_eq!(found.tags.resolve_slice(&tags).unwrap(), &[20, 20]);
    assert!(store.lookup(ExternalId(99)).is_none());
}

#[test]
fn soft_reset_and_repopulate() {
    let mut store = EntityStore::new();
    let mut tags = Arena::new();
    populate(&mut store, &mut tags, &[1, 2, 3]);
    let old_three = store.lookup_ref(ExternalId(3)).unwrap();

    populate(&mut store, &mut tags, &[1, 2]);

    assert!(store.lookup(ExternalId(1)).is_some());
    assert!(store.lookup(ExternalId(2)).is_some());
    assert!(store.lookup(ExternalId(3)).is_none());
    assert_eq!(store.len(), 2);
    assert!(store.get(old_three).is_err());
}

#[test]
fn population_order_is_iteration_order() {
    let mut store = EntityStore::new();
    let mut tags = Arena::new();
    populate(&mut store, &mut tags, &[5, 1, 9]);

    let order: Vec<i64> = store.iter().map(|item| item.id.raw()).collect();
    assert_eq!(order, vec![5, 1, 9]);
}

#[test]
fn duplicate_ids_in_one_batch() {
    let mut store = EntityStore::new();
    let mut tags = Arena::new();
    store.begin_pass(2);

    let first = tags.reserve_relative(1);
    let (_, outcome) = store
        .insert(Item {
            id: ExternalId(4),
            tags: first,
        })
        .unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted);

    let second = tags.reserve_relative(1);
    let (_, outcome) = store
        .insert(Item {
            id: ExternalId(4),
            tags: second,
        })
        .unwrap();
    assert_eq!(outcome, InsertOutcome::Replaced);
    assert_eq!(store.len(), 1);
    assert_eq!(store.lookup(ExternalId(4)).unwrap().tags, second);
}

#[test]
fn large_batch_with_small_initial_capacity() {
    let config = StoreConfig::new()
        .with_arena_initial_capacity(1)
        .with_presize_index(false);
    let mut store = EntityStore::with_config(&config);
    let mut tags = Arena::with_initial_capacity(1);
    let ids: Vec<i64> = (0..2_000).collect();
    populate(&mut store, &mut tags, &ids);

    for raw in [0, 999, 1_999] {
        let item = store.lookup(ExternalId(raw)).unwrap();
        assert_eq!(item.tags.resolve_slice(&tags).unwrap(), &[raw as u32, raw as u32]);
    }
}
