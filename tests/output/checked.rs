//! Integration tests for the checked resolver
//!
//! Tests pass-through behavior and the panics raised for sinks without a
//! system id.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use rngscribe_foundation::{CompilePhase, Tracer};
use rngscribe_output::{CheckedResolver, DirectoryResolver, OutputLocation, OutputResolver, OutputSink};

// =============================================================================
// Pass-through
// =============================================================================

#[test]
fn directory_resolver_passes_the_check() {
    let mut resolver = CheckedResolver::new(DirectoryResolver::new("out"));
    let path = resolver.create_output("urn:books", "Book.rs").unwrap().unwrap();
    assert_eq!(path, Path::new("out").join("Book.rs"));
}

#[test]
fn resolver_may_decline_namespaces() {
    let routes: HashMap<&str, &str> = HashMap::from([("urn:books", "gen/books")]);
    let mut resolver = CheckedResolver::new(
        move |ns: &str, file: &str| -> io::Result<Option<PathBuf>> {
            Ok(routes.get(ns).map(|dir| Path::new(dir).join(file)))
        },
    );

    assert!(resolver.create_output("urn:books", "Book.rs").unwrap().is_some());
    assert!(resolver.create_output("urn:other", "Other.rs").unwrap().is_none());
}

#[test]
fn wrapped_resolver_is_recoverable() {
    let resolver = CheckedResolver::new(DirectoryResolver::new("out"));
    let mut inner = resolver.into_inner();
    let path = inner.create_output("", "a.rs").unwrap().unwrap();
    assert_eq!(path, Path::new("out").join("a.rs"));
    assert!(path.system_id().is_some());
}

#[test]
fn resolution_is_traced_in_the_output_phase() {
    let mut resolver = CheckedResolver::new(DirectoryResolver::new("out")).with_tracer(Tracer::buffered());
    resolver.create_output("urn:a", "A.rs").unwrap();

    let records = resolver.tracer().buffer().records_for_phase(CompilePhase::Output);
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].event_type(), "output-resolved");
}

// =============================================================================
// Contract Violations
// =============================================================================

#[test]
#[should_panic(expected = "System ID cannot be null. (Namespace: [urn:books], Suggested FileName: [Book.rs])")]
fn sink_without_system_id_panics() {
    let mut resolver = CheckedResolver::new(|_: &str, _: &str| -> io::Result<Option<OutputLocation>> {
        Ok(Some(OutputLocation::anonymous()))
    });
    let _ = resolver.create_output("urn:books", "Book.rs");
}

#[test]
#[should_panic(expected = "System ID cannot be empty. (Namespace: [], Suggested FileName: [Root.rs])")]
fn sink_with_empty_system_id_panics() {
    let mut resolver = CheckedResolver::new(|_: &str, _: &str| -> io::Result<Option<OutputLocation>> {
        Ok(Some(OutputLocation::new("")))
    });
    let _ = resolver.create_output("", "Root.rs");
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn non_empty_system_ids_pass_through(id in "[a-z/]{1,16}", ns in "(urn:[a-z]{1,4})?") {
        let expected = id.clone();
        let mut resolver = CheckedResolver::new(move |_: &str, _: &str| -> io::Result<Option<OutputLocation>> {
            Ok(Some(OutputLocation::new(id.clone())))
        });
        let out = resolver.create_output(&ns, "X.rs").unwrap().unwrap();
        prop_assert_eq!(out.system_id(), Some(expected.as_str()));
    }
}
