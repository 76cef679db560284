//! Growable homogeneous arenas.
//!
//! An [`Arena`] owns a contiguous buffer that is filled in bulk while a
//! response is decoded. Growth may move the buffer, so long-lived references
//! are handed out as [`RelativeRef`]s (arena identity + offset) rather than
//! Rust references.

use std::sync::atomic::{AtomicU32, Ordering};

use log::trace;

use crate::relative::RelativeRef;

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identity of an [`Arena`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ArenaId(u32);

impl ArenaId {
    fn next() -> Self {
        Self(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identity value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// A contiguous, growable sequence of `T`.
///
/// Capacity follows its own watermark rather than `Vec`'s policy: the first
/// growth allocates `max(initial_capacity, required)` and every later growth
/// allocates `max(capacity * 2, required * 1.5)`. The arena never shrinks
/// until [`Arena::clear`].
///
/// `soft_reset` and `clear` bump the arena's generation, which invalidates
/// every [`RelativeRef`] issued before.
#[derive(Debug)]
pub struct Arena<T> {
    id: ArenaId,
    generation: u32,
    data: Vec<T>,
    /// Logical capacity (watermark).
    capacity: usize,
    /// Minimum capacity of the first growth.
    initial_capacity: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Default minimum capacity of the first growth.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Creates an empty arena. Nothing is allocated until the first reservation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial_capacity(Self::DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates an empty arena whose first growth allocates at least
    /// `initial_capacity` elements.
    #[must_use]
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self {
            id: ArenaId::next(),
            generation: 0,
            data: Vec::new(),
            capacity: 0,
            initial_capacity: initial_capacity.max(1),
        }
    }

    /// Identity of this arena.
    #[must_use]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Current generation. Incremented by `soft_reset` and `clear`.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of logically valid elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the arena holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of elements the current allocation can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends one element, returning its index.
    pub fn push(&mut self, value: T) -> usize {
        let index = self.data.len();
        self.ensure_room(1);
        self.data.push(value);
        index
    }

    /// Appends one element and returns a reference to it that survives growth.
    pub fn push_relative(&mut self, value: T) -> RelativeRef<T> {
        let offset = self.push(value);
        self.relative(offset, 1)
    }

    /// Builds a relative reference to `len` elements starting at `offset`.
    ///
    /// The range is not checked here; resolution checks it against the
    /// arena's length at that time.
    #[must_use]
    pub fn relative(&self, offset: usize, len: usize) -> RelativeRef<T> {
        RelativeRef::new(self, offset, len)
    }

    /// Gets an element by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Gets a mutable element by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// All valid elements in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// All valid elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over the valid elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Forgets every element but keeps the allocation for the next pass.
    pub fn soft_reset(&mut self) {
        self.data.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Releases the allocation and returns to the empty state.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.capacity = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Grows the watermark so that `additional` more elements fit.
    fn ensure_room(&mut self, additional: usize) {
        let required = self.data.len() + additional;
        if required <= self.capacity {
            return;
        }

        let new_capacity = if self.capacity == 0 {
            self.initial_capacity.max(required)
        } else {
            (self.capacity * 2).max(required + required / 2)
        };

        trace!(
            "arena {} growing from {} to {} elements",
            self.id.0, self.capacity, new_capacity
        );

        self.data.reserve_exact(new_capacity - self.data.len());
        self.capacity = new_capacity;
    }
}

impl<T: Default> Arena<T> {
    /// Reserves `n` default-initialised elements past the current length.
    ///
    /// Returns the index of the first reserved element. The length advances
    /// by `n`, so `[start, start + n)` is immediately writable.
    pub fn reserve(&mut self, n: usize) -> usize {
        let start = self.data.len();
        self.ensure_room(n);
        self.data.resize_with(start + n, T::default);
        start
    }

    /// Like [`Arena::reserve`], returning a relative reference to the
    /// reserved region that stays valid when the arena grows later.
    pub fn reserve_relative(&mut self, n: usize) -> RelativeRef<T> {
        let start = self.reserve(n);
        self.relative(start, n)
    }
}

impl<'a, T> IntoIterator for &'a Arena<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
