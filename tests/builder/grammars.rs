//! Integration tests for grammar structure
//!
//! Tests rule combination, nested grammars, external references, and the
//! errors raised for malformed grammars.

use rngscribe_builder::{
    Annotations, Combine, GrammarBuilder, Parseable, SchemaBuilder, XsdDatatypes, compile,
};
use rngscribe_foundation::{Error, ErrorKind, QName, Result, ValueType};
use rngscribe_model::{CompilerOptions, Leaf, MemberKind, START, ScopeId};

fn text_element(b: &mut GrammarBuilder, name: &str) -> Result<Leaf> {
    let nc = b.name_class_builder().make_name("", name);
    let text = b.make_text(None, Annotations);
    b.make_element(nc, text, None, Annotations)
}

fn element(b: &mut GrammarBuilder, name: &str, content: Leaf) -> Result<Leaf> {
    let nc = b.name_class_builder().make_name("", name);
    b.make_element(nc, content, None, Annotations)
}

// =============================================================================
// Rule Combination
// =============================================================================

#[test]
fn combined_definitions_merge_into_one_rule() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let scope = b.make_grammar(None);
        let title = text_element(b, "title")?;
        b.define(scope, "meta", Combine::Unspecified, title, None, Annotations)?;
        let author = text_element(b, "author")?;
        b.define(scope, "meta", Combine::Interleave, author, None, Annotations)?;
        let date = text_element(b, "date")?;
        b.define(scope, "meta", Combine::Choice, date, None, Annotations)?;

        let meta = b.make_ref(scope, "meta", None, Annotations)?;
        let head = element(b, "head", meta)?;
        b.define(scope, START, Combine::Unspecified, head, None, Annotations)?;
        b.end_grammar(scope, None, Annotations)
    };
    let model = compile(&source, XsdDatatypes, CompilerOptions::default())
        .unwrap()
        .into_model();

    let meta = model.type_for_rule("meta").unwrap();
    assert_eq!(meta.members.len(), 3);
    // head holds only a reference to meta, so it writes through Meta
    assert!(model.by_name("Head").is_none());
    assert_eq!(model.root().map(|t| t.id), Some(meta.id));
}

// =============================================================================
// Nested Grammars
// =============================================================================

#[test]
fn parent_ref_reaches_the_enclosing_grammar() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let outer = b.make_grammar(None);
        let title = text_element(b, "title")?;
        b.define(outer, "heading", Combine::Unspecified, title, None, Annotations)?;

        let inner = b.make_grammar(Some(outer));
        let heading = b.make_parent_ref(inner, "heading", None, Annotations)?;
        let chapter = element(b, "chapter", heading)?;
        b.define(inner, START, Combine::Unspecified, chapter, None, Annotations)?;
        let nested = b.end_grammar(inner, None, Annotations)?;

        let book = element(b, "book", nested)?;
        b.define(outer, START, Combine::Unspecified, book, None, Annotations)?;
        b.end_grammar(outer, None, Annotations)
    };
    let model = compile(&source, XsdDatatypes, CompilerOptions::default())
        .unwrap()
        .into_model();

    let chapter = model.by_name("Chapter").unwrap();
    let title = chapter.element("title").unwrap();
    assert_eq!(title.values, vec![ValueType::Text]);
    assert_eq!(title.alias.as_deref(), Some("heading"));
    assert!(model.by_name("Book").unwrap().element("chapter").is_some());
}

#[test]
fn same_rule_name_in_two_grammars_is_two_rules() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let outer = b.make_grammar(None);
        let a = text_element(b, "a")?;
        let b_elem = text_element(b, "b")?;
        let both = b.make_group(vec![a, b_elem], None, Annotations)?;
        b.define(outer, "body", Combine::Unspecified, both, None, Annotations)?;

        let inner = b.make_grammar(Some(outer));
        let c = text_element(b, "c")?;
        let d = text_element(b, "d")?;
        let both = b.make_group(vec![c, d], None, Annotations)?;
        b.define(inner, "body", Combine::Unspecified, both, None, Annotations)?;
        let inner_body = b.make_ref(inner, "body", None, Annotations)?;
        let section = element(b, "section", inner_body)?;
        b.define(inner, START, Combine::Unspecified, section, None, Annotations)?;
        let nested = b.end_grammar(inner, None, Annotations)?;

        let outer_body = b.make_ref(outer, "body", None, Annotations)?;
        let content = b.make_group(vec![outer_body, nested], None, Annotations)?;
        let doc = element(b, "doc", content)?;
        b.define(outer, START, Combine::Unspecified, doc, None, Annotations)?;
        b.end_grammar(outer, None, Annotations)
    };
    let model = compile(&source, XsdDatatypes, CompilerOptions::default())
        .unwrap()
        .into_model();

    let outer = model.type_for_rule("body").unwrap();
    assert!(outer.element("a").is_some());
    let inner = model.by_name("Body2").unwrap();
    assert!(inner.element("c").is_some());
    assert_eq!(model.rules().len(), 2);
    assert_eq!(model.root().map(|t| t.name.as_str()), Some("Doc"));
}

// =============================================================================
// External References
// =============================================================================

/// A grammar with one external library, `common.rng`.
struct Library;

impl Parseable<GrammarBuilder> for Library {
    fn parse(&self, builder: &mut GrammarBuilder) -> Result<Leaf> {
        let scope = builder.make_grammar(None);
        let common = builder.make_external_ref(
            self,
            "common.rng",
            "urn:common",
            Some(scope),
            None,
            Annotations,
        )?;
        let title = text_element(builder, "title")?;
        let content = builder.make_group(vec![common, title], None, Annotations)?;
        let doc = element(builder, "doc", content)?;
        builder.define(scope, START, Combine::Unspecified, doc, None, Annotations)?;
        builder.end_grammar(scope, None, Annotations)
    }

    fn parse_external(
        &self,
        uri: &str,
        builder: &mut GrammarBuilder,
        scope: Option<ScopeId>,
        namespace: &str,
    ) -> Result<Leaf> {
        if uri != "common.rng" {
            return Err(Error::schema_build(format!("{uri} not found"), None));
        }
        let inner = builder.make_grammar(scope);
        let nc = builder.name_class_builder().make_name(namespace, "lang");
        let text = builder.make_text(None, Annotations);
        let lang = builder.make_attribute(nc, text, None, Annotations)?;
        builder.define(inner, START, Combine::Unspecified, lang, None, Annotations)?;
        builder.end_grammar(inner, None, Annotations)
    }
}

/// Like [`Library`], but the external grammar is missing.
struct Broken;

impl Parseable<GrammarBuilder> for Broken {
    fn parse(&self, builder: &mut GrammarBuilder) -> Result<Leaf> {
        builder.make_external_ref(self, "missing.rng", "", None, None, Annotations)
    }

    fn parse_external(
        &self,
        uri: &str,
        builder: &mut GrammarBuilder,
        scope: Option<ScopeId>,
        namespace: &str,
    ) -> Result<Leaf> {
        Library.parse_external(uri, builder, scope, namespace)
    }
}

#[test]
fn external_grammar_is_spliced_in() {
    let model = compile(&Library, XsdDatatypes, CompilerOptions::default())
        .unwrap()
        .into_model();

    let doc = model.by_name("Doc").unwrap();
    let lang = QName::new("urn:common", "lang");
    assert!(doc.member(MemberKind::Attribute, &lang).is_some());
    assert!(doc.element("title").is_some());
}

#[test]
fn missing_external_grammar_fails() {
    let err = compile(&Broken, XsdDatatypes, CompilerOptions::default()).unwrap_err();
    let ErrorKind::ExternalReference { uri, message } = &err.kind else {
        panic!("expected an external reference error, got {err}");
    };
    assert_eq!(uri, "missing.rng");
    assert!(message.contains("missing.rng not found"));
}

#[test]
fn closures_have_no_external_grammars() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let current = |_: &mut GrammarBuilder| -> Result<Leaf> { Ok(Leaf::empty()) };
        b.make_external_ref(&current, "other.rng", "", None, None, Annotations)
    };
    let err = compile(&source, XsdDatatypes, CompilerOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ExternalReference { .. }));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn grammar_without_start_fails() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let scope = b.make_grammar(None);
        let a = text_element(b, "a")?;
        b.define(scope, "a", Combine::Unspecified, a, None, Annotations)?;
        b.end_grammar(scope, None, Annotations)
    };
    let err = compile(&source, XsdDatatypes, CompilerOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SchemaBuild { .. }));
}

#[test]
fn reference_to_undefined_rule_fails() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let scope = b.make_grammar(None);
        let missing = b.make_ref(scope, "inline.attrs", None, Annotations)?;
        let p = element(b, "p", missing)?;
        b.define(scope, START, Combine::Unspecified, p, None, Annotations)?;
        b.end_grammar(scope, None, Annotations)
    };
    let err = compile(&source, XsdDatatypes, CompilerOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "reference to undefined rule: inline.attrs");
}

#[test]
fn empty_rule_name_is_rejected() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let scope = b.make_grammar(None);
        let text = b.make_text(None, Annotations);
        b.define(scope, "", Combine::Unspecified, text, None, Annotations)?;
        b.end_grammar(scope, None, Annotations)
    };
    let err = compile(&source, XsdDatatypes, CompilerOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ContractViolation { what: "empty", .. }));
}

#[test]
fn empty_choice_reports_its_location() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let loc = b.make_location(Some("doc.rng"), 12, 5);
        b.make_choice(Vec::new(), Some(loc), Annotations)
    };
    let err = compile(&source, XsdDatatypes, CompilerOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "schema build error at doc.rng:12:5: choice has no patterns");
}
