//! The entity store: one primary arena indexed by external identifier.
//!
//! Domain stores wrap an [`EntityStore`] and add auxiliary arenas for their
//! variable-length fields. A population pass looks like:
//!
//! 1. [`EntityStore::begin_pass`] with the batch size (resets arena and index)
//! 2. per record: fill auxiliary slices, then [`EntityStore::insert`]
//! 3. once the batch is indexed: resolve cross-references by id
//!
//! An index entry is written only after its arena slot, so a record is never
//! reachable by id before it is complete.

use tessera_foundation::{ExternalId, IdHash, Result, StoreConfig, hash_id};

use crate::arena::Arena;
use crate::index::{IdIndex, InsertOutcome};
use crate::relative::RelativeRef;

/// A record addressable by its external identifier.
pub trait Entity {
    /// The record's identifier.
    fn id(&self) -> ExternalId;

    /// The identifier's hash. Override to return a cached value.
    fn id_hash(&self) -> IdHash {
        hash_id(self.id())
    }
}

/// Primary arena of `T` plus an identifier index over it.
#[derive(Debug)]
pub struct EntityStore<T> {
    records: Arena<T>,
    index: IdIndex<ExternalId, RelativeRef<T>>,
    presize_index: bool,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    /// Creates an empty store with default sizing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Creates an empty store sized from `config`.
    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            records: Arena::with_initial_capacity(config.arena_initial_capacity),
            index: IdIndex::new(),
            presize_index: config.presize_index,
        }
    }

    /// Starts a full population pass of `expected` records.
    ///
    /// Every record and index entry from earlier passes is dropped; references
    /// issued before become stale. Arena capacity is kept.
    pub fn begin_pass(&mut self, expected: usize) {
        self.records.soft_reset();
        if self.presize_index {
            self.index.reset_for(expected);
        } else {
            self.index.clear();
        }
    }

    /// Drops every record and releases the arena's storage.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// Stores a completed record and makes it reachable by id.
    ///
    /// A record whose id is already present overwrites the existing slot
    /// (last write wins) and keeps that slot's reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing slot for the id cannot be resolved,
    /// which means the index and arena disagree.
    pub fn insert(&mut self, record: T) -> Result<(RelativeRef<T>, InsertOutcome)> {
        let id = record.id();
        let hash = record.id_hash();

        if let Some(&slot) = self.index.get(&id, hash) {
            *slot.resolve_mut(&mut self.records)? = record;
            return Ok((slot, InsertOutcome::Replaced));
        }

        let slot = self.records.push_relative(record);
        let outcome = self.index.insert(id, hash, slot);
        Ok((slot, outcome))
    }

    /// Finds a record by id.
    #[must_use]
    pub fn lookup(&self, id: ExternalId) -> Option<&T> {
        self.lookup_hashed(id, hash_id(id))
    }

    /// Finds a record by id with a precomputed hash.
    #[must_use]
    pub fn lookup_hashed(&self, id: ExternalId, hash: IdHash) -> Option<&T> {
        self.lookup_ref_hashed(id, hash)
            .and_then(|slot| slot.resolve(&self.records).ok())
    }

    /// Finds a record by id, mutably.
    pub fn lookup_mut(&mut self, id: ExternalId) -> Option<&mut T> {
        let slot = self.lookup_ref(id)?;
        slot.resolve_mut(&mut self.records).ok()
    }

    /// Finds the slot reference for an id.
    #[must_use]
    pub fn lookup_ref(&self, id: ExternalId) -> Option<RelativeRef<T>> {
        self.lookup_ref_hashed(id, hash_id(id))
    }

    /// Finds the slot reference for an id with a precomputed hash.
    #[must_use]
    pub fn lookup_ref_hashed(&self, id: ExternalId, hash: IdHash) -> Option<RelativeRef<T>> {
        self.index.get(&id, hash).copied()
    }

    /// Slot reference of the record at `position` in population order.
    #[must_use]
    pub fn slot_at(&self, position: usize) -> Option<RelativeRef<T>> {
        (position < self.records.len()).then(|| self.records.relative(position, 1))
    }

    /// Resolves a slot reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is stale or belongs to another store.
    pub fn get(&self, slot: RelativeRef<T>) -> Result<&T> {
        slot.resolve(&self.records)
    }

    /// Resolves a slot reference, mutably.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is stale or belongs to another store.
    pub fn get_mut(&mut self, slot: RelativeRef<T>) -> Result<&mut T> {
        slot.resolve_mut(&mut self.records)
    }

    /// Returns true if a record with this id is present.
    #[must_use]
    pub fn contains(&self, id: ExternalId) -> bool {
        self.index.contains(&id, hash_id(id))
    }

    /// Number of distinct records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in population order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// The primary arena.
    #[must_use]
    pub fn records(&self) -> &Arena<T> {
        &self.records
    }

    /// The identifier index.
    #[must_use]
    pub fn index(&self) -> &IdIndex<ExternalId, RelativeRef<T>> {
        &self.index
    }
}
