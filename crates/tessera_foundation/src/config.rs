//! Sizing configuration shared by every store.

/// Configuration for arenas and identifier indices.
///
/// All values are plain sizing hints; none of them changes observable
/// lookup behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Capacity of a primary arena on its first growth.
    pub arena_initial_capacity: usize,

    /// Capacity of an auxiliary (sub-collection) arena on its first growth.
    pub auxiliary_initial_capacity: usize,

    /// Start each population pass's index at the tier that fits the batch.
    ///
    /// When false the index starts at the smallest tier and grows as records
    /// are inserted.
    pub presize_index: bool,
}

impl StoreConfig {
    /// Default first-growth capacity for primary arenas.
    pub const DEFAULT_ARENA_INITIAL_CAPACITY: usize = 32;

    /// Default first-growth capacity for auxiliary arenas.
    pub const DEFAULT_AUXILIARY_INITIAL_CAPACITY: usize = 8;

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena_initial_capacity: Self::DEFAULT_ARENA_INITIAL_CAPACITY,
            auxiliary_initial_capacity: Self::DEFAULT_AUXILIARY_INITIAL_CAPACITY,
            presize_index: true,
        }
    }

    /// Builder method to set the primary arena's first-growth capacity.
    #[must_use]
    pub fn with_arena_initial_capacity(mut self, capacity: usize) -> Self {
        self.arena_initial_capacity = capacity;
        self
    }

    /// Builder method to set the auxiliary arenas' first-growth capacity.
    #[must_use]
    pub fn with_auxiliary_initial_capacity(mut self, capacity: usize) -> Self {
        self.auxiliary_initial_capacity = capacity;
        self
    }

    /// Builder method to enable/disable index pre-sizing.
    #[must_use]
    pub fn with_presize_index(mut self, presize: bool) -> Self {
        self.presize_index = presize;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}
