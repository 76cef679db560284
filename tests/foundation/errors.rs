//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use tessera_foundation::{Error, ErrorContext, ErrorKind, ExternalId};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_foreign_arena() {
    let err = Error::foreign_arena(1, 2);
    assert!(matches!(
        err.kind,
        ErrorKind::ForeignArena {
            expected: 1,
            actual: 2
        }
    ));
    let msg = format!("{err}");
    assert!(msg.contains("arena 1"));
    assert!(msg.contains("arena 2"));
}

#[test]
fn error_out_of_bounds() {
    let err = Error::out_of_bounds(10, 4);
    assert!(matches!(err.kind, ErrorKind::OutOfBounds { end: 10, length: 4 }));
}

#[test]
fn error_index_exhausted() {
    let err = Error::index_exhausted(5);
    assert_eq!(format!("{err}"), "identifier index exhausted at capacity 5");
}

#[test]
fn error_missing_field() {
    let err = Error::missing_field("id");
    assert!(matches!(err.kind, ErrorKind::MissingField("id")));
    assert!(format!("{err}").contains("id"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_builder() {
    let context = ErrorContext::new()
        .with_store("folders")
        .with_record(3)
        .with_id(ExternalId(77));
    assert_eq!(format!("{context}"), "in folders record 3 (id 77)");
}

#[test]
fn context_attaches_to_error() {
    let err = Error::invalid_field("title", "string")
        .with_context(ErrorContext::new().with_store("tasks"));
    assert_eq!(err.context.unwrap().store, Some("tasks"));
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&Error::missing_field("id"));
}
