//! Named grammar rules and the arena that owns them.
//!
//! Rules may refer to themselves or to each other, so they are allocated in
//! a [`DefineArena`] and referenced by [`DefineId`] rather than by pointer.

use std::fmt;
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rngscribe_foundation::Location;

use crate::leaf::Leaf;
use crate::model::TypeId;

/// Name of the distinguished start rule.
///
/// The NUL characters keep it from colliding with any name a grammar can
/// declare.
pub const START: &str = "\u{0}#start\u{0}";

// =============================================================================
// Identifiers
// =============================================================================

/// Identity of a rule inside a [`DefineArena`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefineId(u32);

impl DefineId {
    /// Creates an id from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this rule.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DefineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefineId({})", self.0)
    }
}

/// Identity of a grammar scope. Each `<grammar>` opens a new scope.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScopeId(u32);

impl ScopeId {
    /// The outermost scope.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Creates an id from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this scope.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

// =============================================================================
// Define
// =============================================================================

/// How far a rule has progressed through compilation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ProcessState {
    /// Not yet visited by the compiler.
    #[default]
    Unprocessed,
    /// Output type (if any) allocated.
    Declared,
    /// Members populated.
    Generated,
}

/// A named grammar rule.
#[derive(Clone, Debug)]
pub struct Define {
    /// The grammar scope the rule belongs to.
    pub scope: ScopeId,
    /// The rule name.
    pub name: String,
    /// The merged content; `None` until the rule is defined.
    pub pattern: Option<Leaf>,
    /// Where the rule was first defined.
    pub location: Option<Location>,
    pub(crate) output: Option<TypeId>,
    pub(crate) state: ProcessState,
}

impl Define {
    /// Creates an undefined rule.
    #[must_use]
    pub fn new(scope: ScopeId, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
            pattern: None,
            location: None,
            output: None,
            state: ProcessState::Unprocessed,
        }
    }

    /// Returns true if this is a grammar's start rule.
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.name == START
    }

    /// Returns true once a pattern has been supplied.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.pattern.is_some()
    }

    /// Returns the immediate children of the rule's merged pattern.
    #[must_use]
    pub fn children(&self) -> &[Leaf] {
        self.pattern.as_ref().map_or(&[][..], Leaf::children)
    }

    /// A rule with exactly one child is spliced into its callers instead of
    /// getting its own output type.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.children().len() == 1
    }

    /// Merges another definition into this rule (`combine="choice"` or
    /// `combine="interleave"`, both of which collapse to merge).
    pub fn add_pattern(&mut self, pattern: Leaf, location: Option<Location>) {
        self.pattern = Some(match self.pattern.take() {
            Some(existing) => existing.merge(pattern),
            None => pattern,
        });
        if self.location.is_none() {
            self.location = location;
        }
    }

    /// The materialized output type, once declared.
    #[must_use]
    pub fn output(&self) -> Option<TypeId> {
        self.output
    }

    /// Current compilation state.
    #[must_use]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Human-readable name, with the start rule spelled out.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.is_start() { "start" } else { &self.name }
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Owns every rule created during a compilation run.
///
/// Rules are never removed, so a [`DefineId`] stays valid for the life of
/// the arena.
#[derive(Clone, Debug, Default)]
pub struct DefineArena {
    defines: Vec<Define>,
}

impl DefineArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new, undefined rule.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` rules are allocated.
    pub fn alloc(&mut self, scope: ScopeId, name: impl Into<String>) -> DefineId {
        let id = DefineId(u32::try_from(self.defines.len()).expect("too many rules"));
        self.defines.push(Define::new(scope, name));
        id
    }

    /// Returns a rule by id.
    #[must_use]
    pub fn get(&self, id: DefineId) -> Option<&Define> {
        self.defines.get(id.index())
    }

    /// Returns a rule by id, mutably.
    pub fn get_mut(&mut self, id: DefineId) -> Option<&mut Define> {
        self.defines.get_mut(id.index())
    }

    /// Number of rules allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    /// Returns true if no rules have been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Iterates rules with their ids, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (DefineId, &Define)> {
        self.defines
            .iter()
            .enumerate()
            .map(|(i, d)| (DefineId(i as u32), d))
    }
}

impl Index<DefineId> for DefineArena {
    type Output = Define;

    fn index(&self, id: DefineId) -> &Define {
        &self.defines[id.index()]
    }
}

impl IndexMut<DefineId> for DefineArena {
    fn index_mut(&mut self, id: DefineId) -> &mut Define {
        &mut self.defines[id.index()]
    }
}
