//! Integration tests for Layer 0: Foundation
//!
//! Tests for identifiers, identifier hashing, errors, and configuration.

mod errors;
mod ids;
