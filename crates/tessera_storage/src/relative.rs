//! References into an arena that survive its reallocation.
//!
//! A [`RelativeRef`] records which arena issued it, the arena's generation
//! at that time, and an offset/length pair. It never caches an address:
//! every resolve reads the arena's current storage, so growth of the arena
//! between creation and use is harmless.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use tessera_foundation::{Error, Result};

use crate::arena::{Arena, ArenaId};

/// Handle to `len` consecutive elements of an [`Arena<T>`].
///
/// Resolution fails with a typed error when the reference is used with a
/// different arena, after that arena was reset or cleared, or when the range
/// no longer fits inside the arena.
pub struct RelativeRef<T> {
    arena: ArenaId,
    generation: u32,
    offset: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RelativeRef<T> {
    /// Binds a reference to `arena` at `offset`, spanning `len` elements.
    #[must_use]
    pub fn new(arena: &Arena<T>, offset: usize, len: usize) -> Self {
        Self {
            arena: arena.id(),
            generation: arena.generation(),
            offset,
            len,
            _marker: PhantomData,
        }
    }

    /// Index of the first referenced element.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of referenced elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the reference spans no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Identity of the arena that issued this reference.
    #[must_use]
    pub fn arena_id(&self) -> ArenaId {
        self.arena
    }

    /// Arena generation at the time this reference was issued.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns true if this reference can currently be resolved against `arena`.
    #[must_use]
    pub fn is_valid_in(&self, arena: &Arena<T>) -> bool {
        self.check(arena).is_ok()
    }

    /// The first referenced element.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is foreign, stale, empty, or out of range.
    pub fn resolve<'a>(&self, arena: &'a Arena<T>) -> Result<&'a T> {
        self.get(arena, 0)
    }

    /// The first referenced element, mutably.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is foreign, stale, empty, or out of range.
    pub fn resolve_mut<'a>(&self, arena: &'a mut Arena<T>) -> Result<&'a mut T> {
        self.get_mut(arena, 0)
    }

    /// All referenced elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is foreign, stale, or out of range.
    pub fn resolve_slice<'a>(&self, arena: &'a Arena<T>) -> Result<&'a [T]> {
        self.check(arena)?;
        Ok(&arena.as_slice()[self.offset..self.offset + self.len])
    }

    /// All referenced elements, mutably.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is foreign, stale, or out of range.
    pub fn resolve_slice_mut<'a>(&self, arena: &'a mut Arena<T>) -> Result<&'a mut [T]> {
        self.check(arena)?;
        Ok(&mut arena.as_mut_slice()[self.offset..self.offset + self.len])
    }

    /// The element at `index` within the referenced range.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is foreign, stale, or out of range,
    /// or if `index` is not below [`RelativeRef::len`].
    pub fn get<'a>(&self, arena: &'a Arena<T>, index: usize) -> Result<&'a T> {
        self.resolve_slice(arena)?
            .get(index)
            .ok_or_else(|| Error::out_of_bounds(index.saturating_add(1), self.len))
    }

    /// The element at `index` within the referenced range, mutably.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is foreign, stale, or out of range,
    /// or if `index` is not below [`RelativeRef::len`].
    pub fn get_mut<'a>(&self, arena: &'a mut Arena<T>, index: usize) -> Result<&'a mut T> {
        let len = self.len;
        self.resolve_slice_mut(arena)?
            .get_mut(index)
            .ok_or_else(|| Error::out_of_bounds(index.saturating_add(1), len))
    }

    fn check(&self, arena: &Arena<T>) -> Result<()> {
        if self.arena != arena.id() {
            return Err(Error::foreign_arena(
                self.arena.value(),
                arena.id().value(),
            ));
        }
        if self.generation != arena.generation() {
            return Err(Error::stale_reference(self.generation, arena.generation()));
        }
        match self.offset.checked_add(self.len) {
            Some(end) if end <= arena.len() => {}
            Some(end) => return Err(Error::out_of_bounds(end, arena.len())),
            None => return Err(Error::out_of_bounds(usize::MAX, arena.len())),
        }
        Ok(())
    }
}

// Manual impls: derives would put bounds on `T`, which is only a marker here.

impl<T> Clone for RelativeRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RelativeRef<T> {}

impl<T> PartialEq for RelativeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.arena == other.arena
            && self.generation == other.generation
            && self.offset == other.offset
            && self.len == other.len
    }
}

impl<T> Eq for RelativeRef<T> {}

impl<T> Hash for RelativeRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arena.hash(state);
        self.generation.hash(state);
        self.offset.hash(state);
        self.len.hash(state);
    }
}

impl<T> fmt::Debug for RelativeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RelativeRef(arena={}, gen={}, off={}, len={})",
            self.arena.value(),
            self.generation,
            self.offset,
            self.len
        )
    }
}
