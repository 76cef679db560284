//! Identifiers, hashing, errors, and configuration for Tessera.
//!
//! This crate provides:
//! - [`ExternalId`] - Identifiers assigned by the remote service
//! - [`IdHash`] / [`hash_id`] - Seeded identifier hashing
//! - [`Error`] - Error types with context
//! - [`StoreConfig`] - Sizing knobs shared by every store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod id;

pub use config::StoreConfig;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::{ExternalId, HASH_SEED, IdHash, hash_id};
