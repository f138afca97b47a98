//! The generated type model.
//!
//! A [`TypeModel`] is the compiler's output: a set of named writer types,
//! each declaring one member per distinct attribute or element name and the
//! other types it extends. A code-rendering backend consumes it once
//! compilation is finished; after that it is read-only.

use std::fmt;

use im::{OrdMap, OrdSet};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rngscribe_foundation::{QName, ValueType};

use crate::define::ScopeId;

// =============================================================================
// Identifiers
// =============================================================================

/// Identity of an output type inside a [`TypeModel`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeId(u32);

impl TypeId {
    /// Returns the raw index of this type.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Key of a rule in the rule-to-type mapping.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleKey {
    /// The grammar scope of the rule.
    pub scope: ScopeId,
    /// The rule name.
    pub name: String,
}

// =============================================================================
// Output Types
// =============================================================================

/// What an output type was declared for.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeOrigin {
    /// A non-inline grammar rule.
    Rule(RuleKey),
    /// An element with structured content.
    Element(QName),
}

impl fmt::Display for TypeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(key) if key.name == crate::define::START => write!(f, "rule start"),
            Self::Rule(key) => write!(f, "rule {}", key.name),
            Self::Element(name) => write!(f, "element {name}"),
        }
    }
}

/// Which kind of markup a member writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MemberKind {
    /// Writes an attribute.
    Attribute,
    /// Writes a child element.
    Element,
}

/// What a member returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Returns {
    /// The enclosing type, for fluent chaining.
    Owner,
    /// Nothing.
    Nothing,
}

/// A member operation of an output type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    /// Attribute or element.
    pub kind: MemberKind,
    /// The qualified name written.
    pub name: QName,
    /// Display name inherited from an inline rule, if any.
    pub alias: Option<String>,
    /// Value types accepted as the member's argument. Empty for structured
    /// and empty elements.
    pub values: Vec<ValueType>,
    /// The nested writer type for an element with structured content.
    pub content: Option<TypeId>,
    /// What calling the member returns.
    pub returns: Returns,
    /// Whether the grammar allows the markup to be omitted.
    pub optional: bool,
}

impl Member {
    /// The member's operation name: the name's local part.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.name.local
    }
}

/// A named writer type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputType {
    /// The type's identity.
    pub id: TypeId,
    /// Unique type name.
    pub name: String,
    /// What the type was declared for.
    pub origin: TypeOrigin,
    /// Member operations, in generation order.
    pub members: Vec<Member>,
    /// Materialized rule types this type structurally extends.
    pub extends: OrdSet<TypeId>,
    /// Every generated type is a typed writer, which keeps inline and
    /// materialized rules substitutable at their use sites.
    pub typed_writer: bool,
}

impl OutputType {
    /// Finds a member by kind and name.
    #[must_use]
    pub fn member(&self, kind: MemberKind, name: &QName) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.kind == kind && &m.name == name)
    }

    /// Finds an attribute member by local name.
    #[must_use]
    pub fn attribute(&self, local: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.kind == MemberKind::Attribute && m.name.local == local)
    }

    /// Finds an element member by local name.
    #[must_use]
    pub fn element(&self, local: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.kind == MemberKind::Element && m.name.local == local)
    }
}

// =============================================================================
// Type Model
// =============================================================================

/// All output types produced by a compilation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeModel {
    types: Vec<OutputType>,
    names: OrdMap<String, TypeId>,
    rules: OrdMap<RuleKey, TypeId>,
    root: Option<TypeId>,
}

impl TypeModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new, memberless type.
    ///
    /// `base` is turned into a type identifier and made unique by appending
    /// a counter when needed. Rule origins are recorded in the rule mapping.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` types are allocated.
    pub fn create_type(&mut self, base: &str, origin: TypeOrigin) -> TypeId {
        let id = TypeId(u32::try_from(self.types.len()).expect("too many output types"));
        let name = self.unique_name(&type_name(base));

        self.names.insert(name.clone(), id);
        if let TypeOrigin::Rule(key) = &origin {
            self.rules.insert(key.clone(), id);
        }
        self.types.push(OutputType {
            id,
            name,
            origin,
            members: Vec::new(),
            extends: OrdSet::new(),
            typed_writer: true,
        });
        id
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.names.contains_key(name) {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name}{n}"))
            .find(|candidate| !self.names.contains_key(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    /// Returns a type by id.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&OutputType> {
        self.types.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> Option<&mut OutputType> {
        self.types.get_mut(id.index())
    }

    /// Returns a type by its unique name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&OutputType> {
        self.names.get(name).and_then(|id| self.get(*id))
    }

    /// Returns the type materialized for a rule.
    ///
    /// The outermost grammar scope is searched first.
    #[must_use]
    pub fn type_for_rule(&self, name: &str) -> Option<&OutputType> {
        let root = RuleKey {
            scope: ScopeId::ROOT,
            name: name.to_string(),
        };
        self.rules
            .get(&root)
            .or_else(|| {
                self.rules
                    .keys()
                    .find(|key| key.name == name)
                    .and_then(|key| self.rules.get(key))
            })
            .and_then(|id| self.get(*id))
    }

    /// The type a document writer starts from.
    ///
    /// This is the start rule's own type when it has zero or several
    /// children. A start rule with a single child lends it the role: the
    /// type of its element, or of the rule it refers to. `None` when that
    /// child has no type (an attribute, or an element holding only text).
    #[must_use]
    pub fn root(&self) -> Option<&OutputType> {
        self.root.and_then(|id| self.get(id))
    }

    pub(crate) fn set_root(&mut self, root: Option<TypeId>) {
        self.root = root;
    }

    /// Returns the rule-to-type mapping.
    #[must_use]
    pub fn rules(&self) -> &OrdMap<RuleKey, TypeId> {
        &self.rules
    }

    /// Iterates types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &OutputType> {
        self.types.iter()
    }

    /// Number of types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn name_of(&self, id: TypeId) -> &str {
        self.get(id).map_or("?", |t| t.name.as_str())
    }
}

impl fmt::Display for TypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "type {} ({})", ty.name, ty.origin)?;
            if !ty.extends.is_empty() {
                let parents: Vec<&str> = ty.extends.iter().map(|id| self.name_of(*id)).collect();
                write!(f, " extends {}", parents.join(", "))?;
            }
            writeln!(f, " {{")?;
            for m in &ty.members {
                let sigil = match m.kind {
                    MemberKind::Attribute => "@",
                    MemberKind::Element => "",
                };
                let args: Vec<String> = m.values.iter().map(ToString::to_string).collect();
                let optional = if m.optional { "?" } else { "" };
                write!(f, "    {sigil}{}({}){optional}", m.method_name(), args.join(" | "))?;
                if let Some(content) = m.content {
                    write!(f, " {{ {} }}", self.name_of(content))?;
                }
                if m.returns == Returns::Owner {
                    write!(f, " -> {}", ty.name)?;
                }
                writeln!(f)?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// Turns a rule or element name into an `UpperCamelCase` type identifier.
///
/// Non-alphanumeric characters split words; a leading digit gets a `_`
/// prefix; an empty result becomes `Type`.
#[must_use]
pub fn type_name(base: &str) -> String {
    let mut out = String::with_capacity(base.len());
    for word in base.split(|c: char| !c.is_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() {
        return "Type".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
