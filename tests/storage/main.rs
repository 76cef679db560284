//! Integration tests for Layer 1: Storage
//!
//! Tests for arenas, relative references, the identifier index, and entity stores.

#![deny(unused_must_use)]

mod arena;
mod index;
mod relative;
mod store;
