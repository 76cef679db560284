//! Error types for Tessera stores.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Lookup misses are not errors and never appear here.

use std::fmt;

use thiserror::Error;

use crate::id::ExternalId;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Tessera operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a foreign arena error.
    #[must_use]
    pub fn foreign_arena(expected: u32, actual: u32) -> Self {
        Self::new(ErrorKind::ForeignArena { expected, actual })
    }

    /// Creates a stale reference error.
    #[must_use]
    pub fn stale_reference(reference_generation: u32, arena_generation: u32) -> Self {
        Self::new(ErrorKind::StaleReference {
            reference_generation,
            arena_generation,
        })
    }

    /// Creates an out of bounds error.
    #[must_use]
    pub fn out_of_bounds(end: usize, length: usize) -> Self {
        Self::new(ErrorKind::OutOfBounds { end, length })
    }

    /// Creates an index exhaustion error.
    #[must_use]
    pub fn index_exhausted(capacity: usize) -> Self {
        Self::new(ErrorKind::IndexExhausted { capacity })
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::new(ErrorKind::MissingField(field))
    }

    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, expected: &'static str) -> Self {
        Self::new(ErrorKind::InvalidField {
            field: field.into(),
            expected,
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A relative reference was resolved against an arena that did not issue it.
    #[error("reference belongs to arena {expected}, resolved against arena {actual}")]
    ForeignArena {
        /// Arena that issued the reference.
        expected: u32,
        /// Arena the caller passed in.
        actual: u32,
    },

    /// The arena was reset or cleared after the reference was issued.
    #[error("stale reference: issued in generation {reference_generation}, arena is at {arena_generation}")]
    StaleReference {
        /// Generation recorded in the reference.
        reference_generation: u32,
        /// Current generation of the arena.
        arena_generation: u32,
    },

    /// The referenced range extends past the arena's length.
    #[error("reference out of bounds: ends at {end} (length {length})")]
    OutOfBounds {
        /// One past the last referenced element.
        end: usize,
        /// The arena's current length.
        length: usize,
    },

    /// The identifier index probed every slot without finding room.
    #[error("identifier index exhausted at capacity {capacity}")]
    IndexExhausted {
        /// Slot count of the table that was probed.
        capacity: usize,
    },

    /// A decoded record lacked a required field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A decoded field carried a value of the wrong shape.
    #[error("invalid field {field}: expected {expected}")]
    InvalidField {
        /// The offending key.
        field: String,
        /// Description of the expected value.
        expected: &'static str,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Store that was being populated.
    pub store: Option<&'static str>,
    /// Position of the record within its batch.
    pub record: Option<usize>,
    /// Identifier of the record, when it had been decoded already.
    pub id: Option<ExternalId>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store name.
    #[must_use]
    pub fn with_store(mut self, store: &'static str) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the record position.
    #[must_use]
    pub fn with_record(mut self, record: usize) -> Self {
        self.record = Some(record);
        self
    }

    /// Sets the record identifier.
    #[must_use]
    pub fn with_id(mut self, id: ExternalId) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(store) = self.store {
            write!(f, "in {store}")?;
        }
        if let Some(record) = self.record {
            write!(f, " record {record}")?;
        }
        if let Some(id) = self.id {
            write!(f, " (id {id})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_stale_reference() {
        let err = Error::stale_reference(1, 3);
        assert!(matches!(
            err.kind,
            ErrorKind::StaleReference {
                reference_generation: 1,
                arena_generation: 3
            }
        ));
        let msg = format!("{err}");
        assert!(msg.contains("generation 1"));
    }

    #[test]
    fn error_index_exhausted_display() {
        let err = Error::index_exhausted(5);
        assert_eq!(format!("{err}"), "identifier index exhausted at capacity 5");
    }

    #[test]
    fn error_with_context() {
        let err = Error::missing_field("id").with_context(
            ErrorContext::new()
                .with_store("folders")
                .with_record(4),
        );

        let ctx = err.context.unwrap();
        assert_eq!(ctx.store, Some("folders"));
        assert_eq!(ctx.record, Some(4));
        assert_eq!(format!("{ctx}"), "in folders record 4");
    }

    #[test]
    fn error_invalid_field() {
        let err = Error::invalid_field("childIds", "array of ids");
        assert!(matches!(err.kind, ErrorKind::InvalidField { .. }));
        assert!(format!("{err}").contains("childIds"));
    }
}
