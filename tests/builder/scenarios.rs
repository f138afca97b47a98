//! End-to-end compilation scenarios
//!
//! Each test drives a [`GrammarBuilder`] the way a grammar parser would and
//! checks the compiled writer types.

use rngscribe_builder::{
    Annotations, Combine, GrammarBuilder, SchemaBuilder, XsdDatatypes, compile,
};
use rngscribe_foundation::{Result, ValueType};
use rngscribe_model::{CompilerOptions, Leaf, LeafKind, START, TypeModel};

fn attribute(b: &mut GrammarBuilder, name: &str) -> Result<Leaf> {
    let nc = b.name_class_builder().make_name("", name);
    let text = b.make_text(None, Annotations);
    b.make_attribute(nc, text, None, Annotations)
}

fn element(b: &mut GrammarBuilder, name: &str, content: Leaf) -> Result<Leaf> {
    let nc = b.name_class_builder().make_name("", name);
    b.make_element(nc, content, None, Annotations)
}

fn group(b: &mut GrammarBuilder, patterns: Vec<Leaf>) -> Result<Leaf> {
    b.make_group(patterns, None, Annotations)
}

fn model_of(source: impl Fn(&mut GrammarBuilder) -> Result<Leaf>) -> TypeModel {
    compile(&source, XsdDatatypes, CompilerOptions::default())
        .unwrap()
        .into_model()
}

// =============================================================================
// Scenarios
// =============================================================================

/// `start = element A { attribute x {text}, attribute x {text} }`
#[test]
fn repeated_attribute_yields_one_member() {
    let model = model_of(|b| {
        let x1 = attribute(b, "x")?;
        let x2 = attribute(b, "x")?;
        let content = group(b, vec![x1, x2])?;
        element(b, "A", content)
    });

    let a = model.by_name("A").unwrap();
    assert_eq!(a.members.len(), 1);
    assert_eq!(a.attribute("x").unwrap().values, vec![ValueType::Text]);

    // the start rule has one child, so A is the whole model
    assert_eq!(model.len(), 1);
    assert_eq!(model.root().map(|t| t.id), Some(a.id));
}

/// `start = element A { element B {text} }?`
#[test]
fn optional_element_is_optional_at_its_use_site() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let text = b.make_text(None, Annotations);
        let inner = element(b, "B", text)?;
        let outer = element(b, "A", inner)?;
        b.make_optional(outer, None, Annotations)
    };

    let use_site = source(&mut GrammarBuilder::new(XsdDatatypes)).unwrap();
    assert!(use_site.optional);
    assert!(matches!(use_site.kind, LeafKind::Element(_)));

    let model = model_of(&source);
    let a = model.by_name("A").unwrap();
    assert_eq!(a.members.len(), 1);
    let b = a.element("B").unwrap();
    assert_eq!(b.values, vec![ValueType::Text]);
    assert!(!b.optional);
    assert_eq!(model.root().map(|t| t.id), Some(a.id));
}

/// A single-child rule used once is spliced; a multi-child rule used twice
/// is materialized once and shared.
#[test]
fn inline_and_shared_rules() {
    let model = model_of(|b| {
        let scope = b.make_grammar(None);

        let id = attribute(b, "id")?;
        b.define(scope, "common", Combine::Unspecified, id, None, Annotations)?;

        let x = attribute(b, "x")?;
        let y = attribute(b, "y")?;
        let shared = group(b, vec![x, y])?;
        b.define(scope, "shared", Combine::Unspecified, shared, None, Annotations)?;

        let shared_a = b.make_ref(scope, "shared", None, Annotations)?;
        let href = attribute(b, "href")?;
        let a_content = group(b, vec![shared_a, href])?;
        let a = element(b, "a", a_content)?;

        let shared_b = b.make_ref(scope, "shared", None, Annotations)?;
        let src = attribute(b, "src")?;
        let b_content = group(b, vec![shared_b, src])?;
        let b_elem = element(b, "b", b_content)?;

        let common = b.make_ref(scope, "common", None, Annotations)?;
        let doc_content = group(b, vec![common, a, b_elem])?;
        let doc = element(b, "doc", doc_content)?;
        b.define(scope, START, Combine::Unspecified, doc, None, Annotations)?;
        b.end_grammar(scope, None, Annotations)
    });

    assert!(model.type_for_rule("common").is_none());
    let doc = model.by_name("Doc").unwrap();
    assert_eq!(doc.attribute("id").unwrap().alias.as_deref(), Some("common"));

    let shared = model.type_for_rule("shared").unwrap();
    assert_eq!(model.iter().filter(|t| t.name.starts_with("Shared")).count(), 1);
    for name in ["A", "B"] {
        let ty = model.by_name(name).unwrap();
        assert!(ty.extends.contains(&shared.id), "{name} should extend Shared");
        assert!(ty.attribute("x").is_none());
    }
    assert_eq!(model.len(), 4);
    assert_eq!(model.root().map(|t| t.id), Some(doc.id));
}

// =============================================================================
// Patterns
// =============================================================================

#[test]
fn name_class_choice_fans_out_to_members() {
    let model = model_of(|b| {
        let ncb = b.name_class_builder();
        let names = ncb.make_choice(vec![ncb.make_name("", "em"), ncb.make_name("", "strong")], None)?;
        let text = b.make_text(None, Annotations);
        let marks = b.make_element(names, text, None, Annotations)?;
        let any = b.name_class_builder().make_any_name();
        let anything = b.make_element(any, Leaf::empty(), None, Annotations)?;
        let content = group(b, vec![marks, anything])?;
        element(b, "p", content)
    });

    let p = model.by_name("P").unwrap();
    assert!(p.element("em").is_some());
    assert!(p.element("strong").is_some());
    assert_eq!(p.members.len(), 2);
}

#[test]
fn mixed_content_with_markup_gets_a_type() {
    let model = model_of(|b| {
        let text = b.make_text(None, Annotations);
        let em = element(b, "em", text)?;
        let mixed = b.make_mixed(em, None, Annotations)?;
        element(b, "p", mixed)
    });

    let p = model.by_name("P").unwrap();
    assert_eq!(p.element("em").unwrap().values, vec![ValueType::Text]);
}

#[test]
fn repetition_keeps_one_member() {
    let model = model_of(|b| {
        let text = b.make_text(None, Annotations);
        let item = element(b, "li", text)?;
        let many = b.make_one_or_more(item, None, Annotations)?;
        let note = attribute(b, "note")?;
        let maybe_note = b.make_zero_or_more(note, None, Annotations)?;
        let content = group(b, vec![many, maybe_note])?;
        element(b, "ul", content)
    });

    let ul = model.by_name("Ul").unwrap();
    assert!(!ul.element("li").unwrap().optional);
    assert!(ul.attribute("note").unwrap().optional);
}

#[test]
fn datatypes_follow_the_resolver() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let data = b.make_data_pattern_builder("urn:money", "amount", None)?;
        let amount = data.make_pattern(None);
        let price = element(b, "price", amount)?;
        let data = b.make_data_pattern_builder("urn:money", "currency", None)?;
        let code = data.make_pattern(None);
        let nc = b.name_class_builder().make_name("", "code");
        let currency = b.make_attribute(nc, code, None, Annotations)?;
        let content = group(b, vec![price, currency])?;
        element(b, "offer", content)
    };
    let resolver = |_: &str, name: &str| (name == "amount").then_some(ValueType::Decimal);
    let model = compile(&source, resolver, CompilerOptions::default())
        .unwrap()
        .into_model();

    let offer = model.by_name("Offer").unwrap();
    assert_eq!(offer.element("price").unwrap().values, vec![ValueType::Decimal]);
    assert_eq!(offer.attribute("code").unwrap().values, vec![ValueType::Text]);
}

#[test]
fn value_choices_become_alternative_arguments() {
    let model = model_of(|b| {
        let yes = b.make_value(rngscribe_builder::XSD_DATATYPES, "boolean", "true", "", None, Annotations)?;
        let count = b.make_value(rngscribe_builder::XSD_DATATYPES, "int", "0", "", None, Annotations)?;
        let either = b.make_choice(vec![yes, count], None, Annotations)?;
        let nc = b.name_class_builder().make_name("", "flag");
        let flag = b.make_attribute(nc, either, None, Annotations)?;
        element(b, "setting", flag)
    });

    let flag = model.by_name("Setting").unwrap().attribute("flag").unwrap();
    assert_eq!(flag.values, vec![ValueType::Boolean, ValueType::Int]);
}

// =============================================================================
// Options and Tracing
// =============================================================================

#[test]
fn options_shape_the_model() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let version = attribute(b, "version")?;
        let lang = attribute(b, "lang")?;
        group(b, vec![version, lang])
    };
    let options = CompilerOptions::new()
        .with_root_type_name("document")
        .with_chain_methods(false);
    let model = compile(&source, XsdDatatypes, options).unwrap().into_model();

    let root = model.by_name("Document").unwrap();
    assert_eq!(root.attribute("version").unwrap().returns, rngscribe_model::Returns::Nothing);
}

#[test]
fn compilation_trace_names_decisions() {
    let source = |b: &mut GrammarBuilder| -> Result<Leaf> {
        let scope = b.make_grammar(None);
        let id = attribute(b, "id")?;
        b.define(scope, "common", Combine::Unspecified, id, None, Annotations)?;
        let common = b.make_ref(scope, "common", None, Annotations)?;
        let name = attribute(b, "name")?;
        let content = group(b, vec![common, name])?;
        let doc = element(b, "doc", content)?;
        b.define(scope, START, Combine::Unspecified, doc, None, Annotations)?;
        b.end_grammar(scope, None, Annotations)
    };
    let options = CompilerOptions::new().with_tracer(rngscribe_foundation::TracerConfig::new().enabled());
    let schema = compile(&source, XsdDatatypes, options).unwrap();

    let trace = schema.trace();
    assert_eq!(trace.by_event_type("rule-defined").len(), 2);
    assert_eq!(trace.by_event_type("type-declared").len(), 1);
    assert_eq!(trace.by_event_type("rule-inlined").len(), 1);
    assert!(schema.model().by_name("Doc").unwrap().attribute("id").is_some());
}
