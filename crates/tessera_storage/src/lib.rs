//! Arena storage and identifier indexing for Tessera.
//!
//! This crate provides:
//! - [`Arena`] - Growable homogeneous storage with amortized growth
//! - [`RelativeRef`] - Handles into an arena that survive reallocation
//! - [`IdIndex`] - Open-addressing identifier index with double hashing
//! - [`EntityStore`] - One primary arena plus an index over its identifiers
//!
//! # Architecture
//!
//! ```text
//! EntityStore<T>
//! ├── Arena<T>                              (primary records)
//! └── IdIndex<ExternalId, RelativeRef<T>>   (id → slot)
//!
//! domain store
//! ├── EntityStore<T>
//! └── Arena<U> × N                          (sub-collections, addressed by RelativeRef<U>)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod index;
pub mod relative;
pub mod store;
pub mod tier;

pub use arena::{Arena, ArenaId};
pub use index::{IdIndex, InsertOutcome};
pub use relative::RelativeRef;
pub use store::{Entity, EntityStore};
pub use tier::{CAPACITY_TIERS, CapacityTier};
