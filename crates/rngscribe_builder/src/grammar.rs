//! Grammar scopes and rule registration.
//!
//! Every `<grammar>` opens a scope that maps rule names to rules. A rule is
//! allocated the first time it is mentioned, by a definition or by a
//! reference, so forward references and recursion need no special handling.
//! Whether every referenced rule was eventually defined is checked when
//! compilation starts.

use std::collections::HashMap;

use rngscribe_foundation::{Error, ErrorKind, Location, Result, validate};
use rngscribe_model::{DefineArena, DefineId, Leaf, START, ScopeId};

/// How a repeated definition combines with earlier ones.
///
/// Every mode merges; the writer model cannot tell choice from interleave.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Combine {
    /// No `combine` attribute.
    #[default]
    Unspecified,
    /// `combine="choice"`.
    Choice,
    /// `combine="interleave"`.
    Interleave,
}

#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    rules: HashMap<String, DefineId>,
}

/// All grammar scopes of one compilation, plus the rules they own.
#[derive(Debug, Default)]
pub struct Grammars {
    scopes: Vec<Scope>,
    defines: DefineArena,
}

impl Grammars {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new scope nested in `parent`.
    ///
    /// The first scope opened is [`ScopeId::ROOT`].
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` scopes are opened.
    pub fn make_grammar(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::new(u32::try_from(self.scopes.len()).expect("too many grammar scopes"));
        self.scopes.push(Scope {
            parent,
            rules: HashMap::new(),
        });
        id
    }

    fn scope(&self, id: ScopeId) -> Result<&Scope> {
        self.scopes
            .get(id.index() as usize)
            .ok_or_else(|| Error::new(ErrorKind::Internal(format!("unknown scope {id:?}"))))
    }

    /// Returns the parent of a scope.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the scope does not exist.
    pub fn parent(&self, id: ScopeId) -> Result<Option<ScopeId>> {
        Ok(self.scope(id)?.parent)
    }

    /// Returns the rule named `name` in `scope`, allocating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the scope does not exist.
    pub fn rule(&mut self, scope: ScopeId, name: &str) -> Result<DefineId> {
        self.scope(scope)?;
        let defines = &mut self.defines;
        let rules = &mut self.scopes[scope.index() as usize].rules;
        Ok(*rules
            .entry(name.to_string())
            .or_insert_with(|| defines.alloc(scope, name)))
    }

    /// Looks up a rule without allocating it.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<DefineId> {
        self.scope(scope).ok()?.rules.get(name).copied()
    }

    /// Adds a definition for `name` in `scope`, merging it into any earlier
    /// definitions.
    ///
    /// # Errors
    ///
    /// Returns a contract violation if `name` is empty, and `Internal` if the
    /// scope does not exist.
    pub fn define(
        &mut self,
        scope: ScopeId,
        name: &str,
        _combine: Combine,
        pattern: Leaf,
        location: Option<Location>,
    ) -> Result<DefineId> {
        validate::not_empty(name, "name")?;
        let id = self.rule(scope, name)?;
        self.defines[id].add_pattern(pattern, location);
        Ok(id)
    }

    /// A reference to `name` in `scope`.
    ///
    /// # Errors
    ///
    /// Returns a contract violation if `name` is empty, and `Internal` if the
    /// scope does not exist.
    pub fn make_ref(&mut self, scope: ScopeId, name: &str, location: Option<Location>) -> Result<Leaf> {
        validate::not_empty(name, "name")?;
        let id = self.rule(scope, name)?;
        Ok(Leaf::reference(id).at(location))
    }

    /// A reference to `name` in the parent of `scope`.
    ///
    /// # Errors
    ///
    /// Returns a schema build error if `scope` is not nested.
    pub fn make_parent_ref(
        &mut self,
        scope: ScopeId,
        name: &str,
        location: Option<Location>,
    ) -> Result<Leaf> {
        let Some(parent) = self.parent(scope)? else {
            return Err(Error::schema_build(
                format!("parentRef to {name} outside a nested grammar"),
                location,
            ));
        };
        self.make_ref(parent, name, location)
    }

    /// Closes a scope, returning a reference to its start rule.
    ///
    /// # Errors
    ///
    /// Returns a schema build error if the scope never defined `start`.
    pub fn end_grammar(&mut self, scope: ScopeId, location: Option<Location>) -> Result<Leaf> {
        match self.lookup(scope, START) {
            Some(start) if self.defines[start].is_defined() => {
                Ok(Leaf::reference(start).at(location))
            }
            _ => Err(Error::schema_build("grammar has no start rule", location)),
        }
    }

    /// The rules allocated so far.
    #[must_use]
    pub fn defines(&self) -> &DefineArena {
        &self.defines
    }

    /// Gives up the rule arena.
    #[must_use]
    pub fn into_defines(self) -> DefineArena {
        self.defines
    }
}
