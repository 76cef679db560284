//! Open-addressing identifier index.
//!
//! [`IdIndex`] maps a key plus its precomputed [`IdHash`] to a payload. All
//! entries live directly in the slot table; collisions are resolved by double
//! hashing:
//!
//! ```text
//! home = hash % capacity
//! step = 1 + hash % rehash_stride_base
//! probe: home, home + step, home + 2*step, ... (mod capacity)
//! ```
//!
//! Entries are never removed individually, so an empty slot on the probe
//! path proves absence and no tombstones are needed. Growth rehashes the
//! whole table into the next [`CapacityTier`].

use log::debug;
use tessera_foundation::{Error, IdHash, Result};

use crate::tier::{self, CAPACITY_TIERS, CapacityTier};

/// Result of a successful insert.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was new; a slot was claimed.
    Inserted,
    /// The key was present; its payload was replaced.
    Replaced,
}

#[derive(Clone, Debug)]
struct Entry<K, V> {
    hash: IdHash,
    key: K,
    payload: V,
}

/// Where a probe sequence ended.
enum Probe {
    /// Slot holding the key.
    Found(usize),
    /// First empty slot on the path.
    Vacant(usize),
    /// The sequence came back to its home slot.
    Exhausted,
}

/// Hash index from identifiers to payloads.
///
/// Keys are compared only after their cached hashes match. Callers supply
/// the hash so it can be computed once per identifier and cached.
#[derive(Clone, Debug)]
pub struct IdIndex<K, V> {
    table: Vec<Option<Entry<K, V>>>,
    tiers: &'static [CapacityTier],
    tier: usize,
    entries: usize,
}

impl<K: Eq, V> Default for IdIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq, V> IdIndex<K, V> {
    /// Creates an empty index at the smallest tier.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tiers(CAPACITY_TIERS, 0)
    }

    /// Creates an empty index sized so that `entries` inserts fit without growth.
    #[must_use]
    pub fn with_capacity_for(entries: usize) -> Self {
        Self::with_tiers(CAPACITY_TIERS, tier::tier_for(CAPACITY_TIERS, entries))
    }

    /// Creates an empty index over a custom tier table, starting at `start_tier`.
    ///
    /// # Panics
    ///
    /// Panics if `tiers` is not a valid table (see [`tier::is_valid_table`])
    /// or `start_tier` is out of range.
    #[must_use]
    pub fn with_tiers(tiers: &'static [CapacityTier], start_tier: usize) -> Self {
        assert!(tier::is_valid_table(tiers), "invalid capacity tier table");
        assert!(start_tier < tiers.len(), "start tier out of range");
        Self {
            table: empty_table(tiers[start_tier].slots()),
            tiers,
            tier: start_tier,
            entries: 0,
        }
    }

    /// Number of present entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Returns true if no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Number of slots in the current table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// Entries the current tier accepts before the next insert grows the table.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.current_tier().max_entries as usize
    }

    /// Position of the current tier in the tier table.
    #[must_use]
    pub fn tier(&self) -> usize {
        self.tier
    }

    /// Inserts or replaces the payload for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the probe sequence visits every slot without finding `key`
    /// or a free slot. That only happens once the tier table is exhausted and
    /// is treated as a broken invariant rather than a dropped entry.
    pub fn insert(&mut self, key: K, hash: IdHash, payload: V) -> InsertOutcome {
        match self.try_insert(key, hash, payload) {
            Ok(outcome) => outcome,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts or replaces the payload for `key`, reporting exhaustion as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexExhausted`](tessera_foundation::ErrorKind::IndexExhausted)
    /// if the table has no room on `key`'s probe path.
    pub fn try_insert(&mut self, key: K, hash: IdHash, payload: V) -> Result<InsertOutcome> {
        if self.entries >= self.max_entries() {
            self.grow()?;
        }
        self.place(Entry { hash, key, payload })
    }

    /// Looks up the payload for `key`.
    #[must_use]
    pub fn get(&self, key: &K, hash: IdHash) -> Option<&V> {
        match self.probe(key, hash) {
            Probe::Found(slot) => self.table[slot].as_ref().map(|entry| &entry.payload),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Looks up the payload for `key`, mutably.
    pub fn get_mut(&mut self, key: &K, hash: IdHash) -> Option<&mut V> {
        match self.probe(key, hash) {
            Probe::Found(slot) => self.table[slot].as_mut().map(|entry| &mut entry.payload),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &K, hash: IdHash) -> bool {
        self.get(key, hash).is_some()
    }

    /// Iterates over present entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, IdHash, &V)> + '_ {
        self.table
            .iter()
            .flatten()
            .map(|entry| (&entry.key, entry.hash, &entry.payload))
    }

    /// Drops every entry and returns to the smallest tier.
    pub fn clear(&mut self) {
        self.reset_to(0);
    }

    /// Drops every entry and resizes to the smallest tier that fits `entries`.
    pub fn reset_for(&mut self, entries: usize) {
        self.reset_to(tier::tier_for(self.tiers, entries));
    }

    fn reset_to(&mut self, tier: usize) {
        self.table = empty_table(self.tiers[tier].slots());
        self.tier = tier;
        self.entries = 0;
    }

    fn current_tier(&self) -> CapacityTier {
        self.tiers[self.tier]
    }

    fn probe(&self, key: &K, hash: IdHash) -> Probe {
        let capacity = self.table.len();
        let hash = hash.value() as usize;
        let home = hash % capacity;
        let step = 1 + hash % self.current_tier().rehash_stride_base as usize;

        let mut slot = home;
        loop {
            match &self.table[slot] {
                None => return Probe::Vacant(slot),
                Some(entry) if entry.hash.value() as usize == hash && entry.key == *key => {
                    return Probe::Found(slot);
                }
                Some(_) => {}
            }

            slot = (slot + step) % capacity;
            if slot == home {
                return Probe::Exhausted;
            }
        }
    }

    /// Writes an entry without checking the growth threshold.
    fn place(&mut self, entry: Entry<K, V>) -> Result<InsertOutcome> {
        match self.probe(&entry.key, entry.hash) {
            Probe::Found(slot) => {
                self.table[slot] = Some(entry);
                Ok(InsertOutcome::Replaced)
            }
            Probe::Vacant(slot) => {
                self.table[slot] = Some(entry);
                self.entries += 1;
                Ok(InsertOutcome::Inserted)
            }
            Probe::Exhausted => Err(Error::index_exhausted(self.table.len())),
        }
    }

    /// Rehashes every entry into the next tier. A no-op on the last tier.
    fn grow(&mut self) -> Result<()> {
        let next = self.tier + 1;
        let Some(&tier) = self.tiers.get(next) else {
            return Ok(());
        };

        debug!(
            "growing id index from {} to {} slots ({} entries)",
            self.table.len(),
            tier.capacity,
            self.entries
        );

        let old = std::mem::replace(&mut self.table, empty_table(tier.slots()));
        self.tier = next;
        self.entries = 0;

        for entry in old.into_iter().flatten() {
            self.place(entry)?;
        }

        Ok(())
    }
}

fn empty_table<K, V>(slots: usize) -> Vec<Option<Entry<K, V>>> {
    std::iter::repeat_with(|| None).take(slots).collect()
}
