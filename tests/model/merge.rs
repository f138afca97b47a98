//! Integration tests for pattern node merging
//!
//! Tests the merge identity, name collapse, optionality rules, and that the
//! order of merging does not change the generated members.

use std::collections::HashSet;

use proptest::prelude::*;
use rngscribe_foundation::{QName, Tracer, ValueType};
use rngscribe_model::{
    CompilerOptions, DefineArena, Leaf, LeafKind, MemberKind, NodeSet, START, ScopeId,
};

fn attr(name: &str) -> Leaf {
    Leaf::attribute(QName::local(name), Leaf::text())
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn empty_is_the_identity() {
    assert!(Leaf::empty().merge(Leaf::empty()).is_empty());

    let merged = attr("x").merge(Leaf::empty());
    assert!(merged.optional);
    assert!(merged.same_shape(&attr("x")));
}

#[test]
fn optional_union_marks_every_member() {
    let merged = attr("x").merge(attr("y")).merge(Leaf::empty());
    assert!(!merged.optional);
    assert!(merged.children().iter().all(|c| c.optional));
}

// =============================================================================
// Name Collapse
// =============================================================================

#[test]
fn same_name_merges_content() {
    let x1 = Leaf::attribute(QName::local("x"), Leaf::text());
    let x2 = Leaf::attribute(QName::local("x"), Leaf::data(ValueType::Int));
    let merged = x1.merge(x2);

    let LeafKind::Attribute(x) = &merged.kind else {
        panic!("expected one attribute, got {merged:?}");
    };
    assert!(x.content.same_shape(&Leaf::text().merge(Leaf::data(ValueType::Int))));
}

#[test]
fn namespaces_keep_names_apart() {
    let a = Leaf::attribute(QName::new("urn:a", "id"), Leaf::text());
    let b = Leaf::attribute(QName::new("urn:b", "id"), Leaf::text());
    assert_eq!(a.merge(b).children().len(), 2);
}

#[test]
fn optionality_survives_collapse() {
    let merged = attr("x").into_optional().merge(attr("x"));
    assert!(merged.optional);
}

#[test]
fn merge_leaves_inputs_untouched() {
    let shared = attr("x").merge(attr("y"));
    let left = shared.clone().merge(attr("z"));
    let right = shared.clone().merge(Leaf::empty());

    assert_eq!(shared.children().len(), 2);
    assert!(shared.children().iter().all(|c| !c.optional));
    assert_eq!(left.children().len(), 3);
    assert!(right.children().iter().all(|c| c.optional));
}

// =============================================================================
// Properties
// =============================================================================

/// A small pattern: empty, text, or a text-valued attribute or element,
/// possibly optional.
fn arb_leaf() -> impl Strategy<Value = Leaf> {
    let name = prop::sample::select(vec!["a", "b", "c"]);
    let ty = prop::sample::select(vec![ValueType::Text, ValueType::Int, ValueType::Boolean]);
    let single = prop_oneof![
        Just(Leaf::empty()),
        ty.clone().prop_map(Leaf::data),
        (name.clone(), ty.clone())
            .prop_map(|(n, t)| Leaf::attribute(QName::local(n), Leaf::data(t))),
        (name, ty).prop_map(|(n, t)| Leaf::element(QName::local(n), Leaf::data(t))),
    ];
    (single, any::<bool>()).prop_map(|(leaf, optional)| {
        if optional { leaf.into_optional() } else { leaf }
    })
}

fn arb_pattern() -> impl Strategy<Value = Leaf> {
    prop::collection::vec(arb_leaf(), 1..4).prop_map(|leaves| Leaf::merge_all(leaves).unwrap())
}

/// Compiles `element doc { content, attribute id }` and returns the members
/// of the `doc` writer.
fn generated_members(content: Leaf) -> HashSet<(MemberKind, QName, bool)> {
    let mut arena = DefineArena::new();
    let start = arena.alloc(ScopeId::ROOT, START);
    let doc = Leaf::element(QName::local("doc"), content.merge(attr("id")));
    arena[start].add_pattern(doc, None);

    let model = NodeSet::new(arena, start, CompilerOptions::default())
        .unwrap()
        .compile(&mut Tracer::disabled())
        .unwrap();
    model
        .root()
        .unwrap()
        .members
        .iter()
        .map(|m| (m.kind, m.name.clone(), m.optional))
        .collect()
}

proptest! {
    #[test]
    fn one_child_per_distinct_name(names in prop::collection::vec("[a-e]{1,2}", 1..24)) {
        let merged = Leaf::merge_all(names.iter().map(|n| attr(n))).unwrap();

        let mut distinct = names.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(merged.children().len(), distinct.len());
    }

    #[test]
    fn merge_with_empty_is_optional(names in prop::collection::vec("[a-z]{1,3}", 1..8)) {
        let merged = Leaf::merge_all(names.iter().map(|n| attr(n))).unwrap();
        let optional = merged.merge(Leaf::empty());
        prop_assert!(optional.children().iter().all(|c| c.optional));
    }

    #[test]
    fn merge_order_does_not_change_members(a in arb_pattern(), b in arb_pattern()) {
        let forward = generated_members(a.clone().merge(b.clone()));
        let backward = generated_members(b.merge(a));
        prop_assert_eq!(forward, backward);
    }
}
