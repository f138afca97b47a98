//! The grammar builder: turns parser callbacks into pattern nodes.
//!
//! Choice, group, and interleave all fold their operands with
//! [`Leaf::merge`]. Repetition is not modeled: `oneOrMore` is its operand,
//! while `zeroOrMore` and `optional` merge it with the empty pattern.
//! `notAllowed` and unreadable constructs become the empty pattern.

use rngscribe_foundation::{CompilePhase, Error, ErrorKind, Location, QName, Result, Tracer};
use rngscribe_model::{DefineArena, DefineId, Leaf, LeafKind, START, ScopeId};

use crate::datatype::{DataPatternBuilder, DatatypeResolver, XsdDatatypes};
use crate::grammar::{Combine, Grammars};
use crate::name_class::NameClass;
use crate::protocol::{Annotations, Parseable, SchemaBuilder};

/// Builds [`Leaf`] patterns and grammar rules from parser callbacks.
pub struct GrammarBuilder {
    grammars: Grammars,
    resolver: Box<dyn DatatypeResolver>,
    tracer: Tracer,
}

impl std::fmt::Debug for GrammarBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarBuilder")
            .field("grammars", &self.grammars)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new(XsdDatatypes)
    }
}

impl GrammarBuilder {
    /// Creates a builder resolving datatypes through `resolver`.
    #[must_use]
    pub fn new(resolver: impl DatatypeResolver + 'static) -> Self {
        Self {
            grammars: Grammars::new(),
            resolver: Box::new(resolver),
            tracer: Tracer::disabled(),
        }
    }

    /// Builder method to record rule definitions through `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, mut tracer: Tracer) -> Self {
        tracer.phase_start(CompilePhase::Build);
        self.tracer = tracer;
        self
    }

    /// The grammar scopes built so far.
    #[must_use]
    pub fn grammars(&self) -> &Grammars {
        &self.grammars
    }

    /// The tracer.
    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Finishes building, returning the rule arena, the entry rule for
    /// `top`, and the tracer.
    ///
    /// A reference is its own entry. Any other pattern is wrapped in a start
    /// rule of its own.
    #[must_use]
    pub fn finish(self, top: Leaf) -> (DefineArena, DefineId, Tracer) {
        let Self {
            grammars,
            mut tracer,
            ..
        } = self;
        let mut defines = grammars.into_defines();

        let reference = match &top.kind {
            LeafKind::Ref(r) => Some(r.define),
            _ => None,
        };
        let entry = match reference {
            Some(id) => id,
            None => {
                let id = defines.alloc(ScopeId::ROOT, START);
                let location = top.location.clone();
                defines[id].add_pattern(top, location);
                tracer.rule_defined(defines[id].display_name(), ScopeId::ROOT.index());
                id
            }
        };
        tracer.phase_end();
        (defines, entry, tracer)
    }

    fn merge(construct: &str, patterns: Vec<Leaf>, location: Option<Location>) -> Result<Leaf> {
        let merged = Leaf::merge_all(patterns).ok_or_else(|| {
            Error::schema_build(format!("{construct} has no patterns"), location.clone())
        })?;
        Ok(if merged.location.is_none() {
            merged.at(location)
        } else {
            merged
        })
    }

    /// One node per concrete name, merged. No names yields the empty
    /// pattern.
    fn per_name(
        name_class: &NameClass,
        location: Option<Location>,
        make: impl Fn(QName) -> Leaf,
    ) -> Leaf {
        let leaves = name_class
            .list_names()
            .into_iter()
            .map(|name| make(name).at(location.clone()));
        Leaf::merge_all(leaves).unwrap_or_else(|| Leaf::empty().at(location))
    }
}

impl SchemaBuilder for GrammarBuilder {
    type Pattern = Leaf;
    type Location = Location;
    type Scope = ScopeId;
    type DataPattern = DataPatternBuilder;

    fn make_location(&self, system_id: Option<&str>, line: u32, column: u32) -> Location {
        Location::new(system_id.map(str::to_string), line, column)
    }

    fn make_choice(
        &mut self,
        patterns: Vec<Leaf>,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Self::merge("choice", patterns, location)
    }

    fn make_group(
        &mut self,
        patterns: Vec<Leaf>,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Self::merge("group", patterns, location)
    }

    fn make_interleave(
        &mut self,
        patterns: Vec<Leaf>,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Self::merge("interleave", patterns, location)
    }

    fn make_one_or_more(
        &mut self,
        pattern: Leaf,
        _location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Ok(pattern)
    }

    fn make_zero_or_more(
        &mut self,
        pattern: Leaf,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Ok(pattern.merge(Leaf::empty().at(location)))
    }

    fn make_optional(
        &mut self,
        pattern: Leaf,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Ok(pattern.merge(Leaf::empty().at(location)))
    }

    fn make_list(
        &mut self,
        pattern: Leaf,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Ok(Leaf::list(pattern).at(location))
    }

    fn make_mixed(
        &mut self,
        pattern: Leaf,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Ok(pattern.merge(Leaf::text().at(location)))
    }

    fn make_empty(&mut self, location: Option<Location>, _annotations: Annotations) -> Leaf {
        Leaf::empty().at(location)
    }

    fn make_not_allowed(&mut self, location: Option<Location>, _annotations: Annotations) -> Leaf {
        Leaf::empty().at(location)
    }

    fn make_text(&mut self, location: Option<Location>, _annotations: Annotations) -> Leaf {
        Leaf::text().at(location)
    }

    fn make_error_pattern(&mut self) -> Leaf {
        Leaf::empty()
    }

    fn make_attribute(
        &mut self,
        name_class: NameClass,
        pattern: Leaf,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Ok(Self::per_name(&name_class, location, |name| {
            Leaf::attribute(name, pattern.clone())
        }))
    }

    fn make_element(
        &mut self,
        name_class: NameClass,
        pattern: Leaf,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        Ok(Self::per_name(&name_class, location, |name| {
            Leaf::element(name, pattern.clone())
        }))
    }

    fn make_data_pattern_builder(
        &mut self,
        library: &str,
        type_name: &str,
        location: Option<Location>,
    ) -> Result<DataPatternBuilder> {
        let ty = self.resolver.resolve_or_text(library, type_name);
        Ok(DataPatternBuilder::new(ty, location))
    }

    fn make_value(
        &mut self,
        library: &str,
        type_name: &str,
        value: &str,
        _namespace: &str,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        let ty = self.resolver.resolve_or_text(library, type_name);
        Ok(Leaf::value(ty, value).at(location))
    }

    fn make_grammar(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.grammars.make_grammar(parent)
    }

    fn define(
        &mut self,
        scope: ScopeId,
        name: &str,
        combine: Combine,
        pattern: Leaf,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<()> {
        let id = self.grammars.define(scope, name, combine, pattern, location)?;
        if self.tracer.is_enabled() {
            let rule = self.grammars.defines()[id].display_name().to_string();
            self.tracer.rule_defined(&rule, scope.index());
        }
        Ok(())
    }

    fn make_ref(
        &mut self,
        scope: ScopeId,
        name: &str,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        self.grammars.make_ref(scope, name, location)
    }

    fn make_parent_ref(
        &mut self,
        scope: ScopeId,
        name: &str,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        self.grammars.make_parent_ref(scope, name, location)
    }

    fn end_grammar(
        &mut self,
        scope: ScopeId,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        self.grammars.end_grammar(scope, location)
    }

    fn make_external_ref(
        &mut self,
        current: &dyn Parseable<Self>,
        uri: &str,
        namespace: &str,
        scope: Option<ScopeId>,
        location: Option<Location>,
        _annotations: Annotations,
    ) -> Result<Leaf> {
        match current.parse_external(uri, self, scope, namespace) {
            Ok(leaf) => Ok(leaf),
            Err(err) if matches!(err.kind, ErrorKind::ExternalReference { .. }) => Err(err),
            Err(err) => {
                let message = match location {
                    Some(location) => format!("{err} (referenced at {location})"),
                    None => err.to_string(),
                };
                Err(Error::external_reference(uri, message))
            }
        }
    }
}
