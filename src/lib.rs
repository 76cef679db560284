//! Tessera - Arena-backed entity storage
//!
//! This crate re-exports all layers of Tessera for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: tessera_domain      - Domain stores, decoder interface, AppState
//! Layer 1: tessera_storage     - Arena, RelativeRef, IdIndex, EntityStore
//! Layer 0: tessera_foundation  - ExternalId, hashing, Error, StoreConfig
//! ```

pub use tessera_domain as domain;
pub use tessera_foundation as foundation;
pub use tessera_storage as storage;
