//! Integration tests for Layer 2: Domain
//!
//! Tests for domain store population, cross-references, and the decoder interface.

mod sources;
mod stores;
