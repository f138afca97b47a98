//! Pattern nodes and the merge algebra.
//!
//! A grammar's content model is reduced to a tree of [`Leaf`] nodes. Choice,
//! group, and interleave all collapse into [`Leaf::merge`]: the writer API can
//! only say "this member exists, possibly optionally", so ordering and
//! exclusivity between siblings are deliberately dropped.
//!
//! Merging never mutates shared nodes. It consumes both operands and returns
//! the combined node, which is the only valid continuation.

use rngscribe_foundation::{Location, QName, ValueType};

use crate::define::DefineId;
use crate::model::TypeId;

// =============================================================================
// Leaf
// =============================================================================

/// A node in a compiled content model.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    /// What this node describes.
    pub kind: LeafKind,
    /// Whether the node may be absent. Always false for [`LeafKind::Union`];
    /// a union's members carry their own flags.
    pub optional: bool,
    /// Where the node was declared.
    pub location: Option<Location>,
}

/// The variants of a pattern node.
#[derive(Clone, Debug, PartialEq)]
pub enum LeafKind {
    /// No content required.
    Empty,
    /// Free text of the given value type.
    Data(ValueType),
    /// A fixed literal value.
    Value {
        /// The literal's value type.
        ty: ValueType,
        /// The literal text.
        literal: String,
    },
    /// A whitespace-separated list; wraps exactly one child.
    List(Box<Leaf>),
    /// A named attribute.
    Attribute(AttributeNode),
    /// A named child element.
    Element(ElementNode),
    /// A reference to a grammar rule.
    Ref(RuleRef),
    /// Two or more merged siblings. Never nested and never containing
    /// [`LeafKind::Empty`].
    Union(Vec<Leaf>),
}

/// Attribute payload.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeNode {
    /// Qualified attribute name.
    pub name: QName,
    /// The attribute's value content.
    pub content: Box<Leaf>,
    /// Display name inherited from an inline rule.
    pub alternative_name: Option<String>,
}

/// Element payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementNode {
    /// Qualified element name.
    pub name: QName,
    /// The element's content model.
    pub content: Box<Leaf>,
    /// Display name inherited from an inline rule.
    pub alternative_name: Option<String>,
    /// The element's own output type, assigned during declare.
    pub output: Option<TypeId>,
}

/// Reference payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleRef {
    /// The referenced rule.
    pub define: DefineId,
    /// Display name inherited from an inline rule.
    pub alias: Option<String>,
}

impl Leaf {
    fn new(kind: LeafKind) -> Self {
        Self {
            kind,
            optional: false,
            location: None,
        }
    }

    /// Creates the empty pattern.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(LeafKind::Empty)
    }

    /// Creates a text pattern of the given type.
    #[must_use]
    pub fn data(ty: ValueType) -> Self {
        Self::new(LeafKind::Data(ty))
    }

    /// Creates a plain text pattern.
    #[must_use]
    pub fn text() -> Self {
        Self::data(ValueType::Text)
    }

    /// Creates a literal value pattern.
    #[must_use]
    pub fn value(ty: ValueType, literal: impl Into<String>) -> Self {
        Self::new(LeafKind::Value {
            ty,
            literal: literal.into(),
        })
    }

    /// Wraps a pattern in a list.
    #[must_use]
    pub fn list(item: Leaf) -> Self {
        Self::new(LeafKind::List(Box::new(item)))
    }

    /// Creates an attribute pattern.
    #[must_use]
    pub fn attribute(name: QName, content: Leaf) -> Self {
        Self::new(LeafKind::Attribute(AttributeNode {
            name,
            content: Box::new(content),
            alternative_name: None,
        }))
    }

    /// Creates an element pattern.
    #[must_use]
    pub fn element(name: QName, content: Leaf) -> Self {
        Self::new(LeafKind::Element(ElementNode {
            name,
            content: Box::new(content),
            alternative_name: None,
            output: None,
        }))
    }

    /// Creates a reference to a grammar rule.
    #[must_use]
    pub fn reference(define: DefineId) -> Self {
        Self::new(LeafKind::Ref(RuleRef {
            define,
            alias: None,
        }))
    }

    /// Attaches a declaration location.
    #[must_use]
    pub fn at(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Returns true for the empty pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, LeafKind::Empty)
    }

    /// Returns the immediate children under this node's merge.
    ///
    /// A union yields its members, the empty pattern yields nothing, and any
    /// other node is its own single child.
    #[must_use]
    pub fn children(&self) -> &[Leaf] {
        match &self.kind {
            LeafKind::Empty => &[],
            LeafKind::Union(members) => members,
            _ => std::slice::from_ref(self),
        }
    }

    /// Mutable counterpart of [`Leaf::children`].
    pub fn children_mut(&mut self) -> &mut [Leaf] {
        let is_union = matches!(self.kind, LeafKind::Union(_));
        if self.is_empty() {
            &mut []
        } else if is_union {
            match &mut self.kind {
                LeafKind::Union(members) => members.as_mut_slice(),
                _ => &mut [],
            }
        } else {
            std::slice::from_mut(self)
        }
    }

    /// Marks this node as possibly absent.
    #[must_use]
    pub fn into_optional(mut self) -> Self {
        match &mut self.kind {
            LeafKind::Union(members) => {
                for member in members {
                    member.optional = true;
                }
            }
            _ => self.optional = true,
        }
        self
    }

    /// Combines two nodes into one whose meaning is the union of both.
    ///
    /// - `Empty` is the identity, but marks the other side optional.
    /// - Attributes (and elements) with equal names merge their content.
    /// - Structurally equal value nodes and repeated references collapse.
    /// - Anything else becomes a sibling in a union.
    #[must_use]
    pub fn merge(self, other: Leaf) -> Leaf {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => self,
            (false, true) => self.into_optional(),
            (true, false) => other.into_optional(),
            (false, false) => {
                let location = self.location.clone();
                let mut members = self.into_members();
                for leaf in other.into_members() {
                    absorb(&mut members, leaf);
                }
                if members.len() == 1 {
                    members.pop().unwrap_or_else(Leaf::empty)
                } else {
                    Leaf {
                        kind: LeafKind::Union(members),
                        optional: false,
                        location,
                    }
                }
            }
        }
    }

    /// Folds a list of nodes left to right with [`Leaf::merge`].
    ///
    /// An empty list yields `None`.
    pub fn merge_all(leaves: impl IntoIterator<Item = Leaf>) -> Option<Leaf> {
        leaves.into_iter().reduce(Leaf::merge)
    }

    fn into_members(self) -> Vec<Leaf> {
        match self.kind {
            LeafKind::Empty => Vec::new(),
            LeafKind::Union(members) => members,
            _ => vec![self],
        }
    }

    /// Returns true if both nodes describe the same thing, ignoring
    /// locations, optionality, and display names.
    #[must_use]
    pub fn same_shape(&self, other: &Leaf) -> bool {
        match (&self.kind, &other.kind) {
            (LeafKind::Empty, LeafKind::Empty) => true,
            (LeafKind::Data(a), LeafKind::Data(b)) => a == b,
            (
                LeafKind::Value { ty: ta, literal: la },
                LeafKind::Value { ty: tb, literal: lb },
            ) => ta == tb && la == lb,
            (LeafKind::List(a), LeafKind::List(b)) => a.same_shape(b),
            (LeafKind::Attribute(a), LeafKind::Attribute(b)) => {
                a.name == b.name && a.content.same_shape(&b.content)
            }
            (LeafKind::Element(a), LeafKind::Element(b)) => {
                a.name == b.name && a.content.same_shape(&b.content)
            }
            (LeafKind::Ref(a), LeafKind::Ref(b)) => a.define == b.define,
            (LeafKind::Union(a), LeafKind::Union(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            _ => false,
        }
    }

    /// Visits every rule reference in this subtree, in declaration order,
    /// along with where the reference was written.
    pub fn for_each_ref(&self, f: &mut impl FnMut(&RuleRef, Option<&Location>)) {
        match &self.kind {
            LeafKind::Ref(r) => f(r, self.location.as_ref()),
            LeafKind::List(item) => item.for_each_ref(f),
            LeafKind::Attribute(a) => a.content.for_each_ref(f),
            LeafKind::Element(e) => e.content.for_each_ref(f),
            LeafKind::Union(members) => {
                for member in members {
                    member.for_each_ref(f);
                }
            }
            LeafKind::Empty | LeafKind::Data(_) | LeafKind::Value { .. } => {}
        }
    }

    /// Visits every element in this subtree, outermost first.
    pub fn for_each_element_mut(&mut self, f: &mut impl FnMut(&mut ElementNode)) {
        match &mut self.kind {
            LeafKind::Element(e) => {
                f(e);
                e.content.for_each_element_mut(f);
            }
            LeafKind::List(item) => item.for_each_element_mut(f),
            LeafKind::Attribute(a) => a.content.for_each_element_mut(f),
            LeafKind::Union(members) => {
                for member in members {
                    member.for_each_element_mut(f);
                }
            }
            LeafKind::Empty | LeafKind::Data(_) | LeafKind::Value { .. } | LeafKind::Ref(_) => {}
        }
    }

    /// Visits every element in this subtree, outermost first.
    pub fn for_each_element(&self, f: &mut impl FnMut(&ElementNode)) {
        match &self.kind {
            LeafKind::Element(e) => {
                f(e);
                e.content.for_each_element(f);
            }
            LeafKind::List(item) => item.for_each_element(f),
            LeafKind::Attribute(a) => a.content.for_each_element(f),
            LeafKind::Union(members) => {
                for member in members {
                    member.for_each_element(f);
                }
            }
            LeafKind::Empty | LeafKind::Data(_) | LeafKind::Value { .. } | LeafKind::Ref(_) => {}
        }
    }
}

/// Adds `leaf` to a list of union members, collapsing it into an existing
/// member with the same name or shape.
fn absorb(members: &mut Vec<Leaf>, leaf: Leaf) {
    let position = members.iter().position(|m| same_slot(m, &leaf));
    let Some(index) = position else {
        members.push(leaf);
        return;
    };

    let existing = members.remove(index);
    let optional = existing.optional || leaf.optional;
    let location = existing.location.clone();

    let kind = match (existing.kind, leaf.kind) {
        (LeafKind::Attribute(mut a), LeafKind::Attribute(b)) => {
            a.content = Box::new(a.content.merge(*b.content));
            a.alternative_name = a.alternative_name.or(b.alternative_name);
            LeafKind::Attribute(a)
        }
        (LeafKind::Element(mut a), LeafKind::Element(b)) => {
            a.content = Box::new(a.content.merge(*b.content));
            a.alternative_name = a.alternative_name.or(b.alternative_name);
            LeafKind::Element(a)
        }
        (kind, _) => kind,
    };

    members.insert(
        index,
        Leaf {
            kind,
            optional,
            location,
        },
    );
}

/// Two union members occupy the same slot if they would produce the same
/// member: same-named attributes or elements, or structurally equal nodes.
fn same_slot(a: &Leaf, b: &Leaf) -> bool {
    match (&a.kind, &b.kind) {
        (LeafKind::Attribute(x), LeafKind::Attribute(y)) => x.name == y.name,
        (LeafKind::Element(x), LeafKind::Element(y)) => x.name == y.name,
        _ => a.same_shape(b),
    }
}
