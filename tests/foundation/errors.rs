//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use rngscribe_foundation::{Error, ErrorContext, ErrorKind, Location, validate};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_schema_build() {
    let loc = Location::new(Some("doc.rng".into()), 7, 2);
    let err = Error::schema_build("group has no patterns", Some(loc.clone()));
    assert!(matches!(err.kind, ErrorKind::SchemaBuild { .. }));
    assert_eq!(err.location(), Some(&loc));
    assert_eq!(
        format!("{err}"),
        "schema build error at doc.rng:7:2: group has no patterns"
    );
}

#[test]
fn error_schema_build_without_location() {
    let err = Error::schema_build("choice has no patterns", None);
    assert_eq!(err.location(), None);
    assert_eq!(format!("{err}"), "schema build error: choice has no patterns");
}

#[test]
fn error_external_reference() {
    let err = Error::external_reference("common.rng", "file not found");
    assert!(matches!(err.kind, ErrorKind::ExternalReference { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("common.rng"));
    assert!(msg.contains("file not found"));
}

#[test]
fn error_unresolved_reference() {
    let err = Error::unresolved_reference("inline.attrs");
    assert_eq!(format!("{err}"), "reference to undefined rule: inline.attrs");
}

#[test]
fn error_recursive_inline() {
    let err = Error::recursive_inline("loop");
    assert!(matches!(err.kind, ErrorKind::RecursiveInline { ref rule } if rule == "loop"));
    assert!(format!("{err}").contains("loop"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_rule_frames_accumulate() {
    let err = Error::recursive_inline("a").in_rule("b").in_rule("start");
    let context = err.context.unwrap();
    assert_eq!(context.stack, vec!["b".to_string(), "start".to_string()]);
}

#[test]
fn error_context_from_location() {
    let loc = Location::new(Some("book.rng".into()), 3, 14);
    let context = ErrorContext::at(&loc).with_frame("chapter");
    let shown = context.to_string();
    assert!(shown.starts_with("at book.rng:3:14"));
    assert!(shown.contains("in chapter"));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn empty_name_is_a_contract_violation() {
    let err = validate::not_empty("", "name").unwrap_err();
    assert_eq!(format!("{err}"), "cannot handle empty 'name' argument");
}

#[test]
fn failed_condition_is_internal() {
    assert!(validate::is_true(true, "unused").is_ok());
    let err = validate::is_true(false, "type table out of sync").unwrap_err();
    assert_eq!(format!("{err}"), "internal error: type table out of sync");
}
