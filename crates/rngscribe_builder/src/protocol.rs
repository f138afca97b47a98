//! The callback protocol between a grammar parser and a schema builder.
//!
//! A parser walks a grammar and calls one [`SchemaBuilder`] method per
//! construct, bottom-up: children are built first and handed to the method
//! for their parent. The parser itself is a [`Parseable`], which the builder
//! calls back into when a grammar pulls in another grammar through
//! `externalRef`.

use rngscribe_foundation::{Error, Result};

use crate::grammar::Combine;
use crate::name_class::{NameClass, NameClassBuilder};

/// Foreign annotations attached to a grammar construct.
///
/// Annotations do not affect the writer model and are not retained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Annotations;

/// Comments attached to a grammar construct.
///
/// Builders that do not use comments never hand one out (see
/// [`SchemaBuilder::make_comment_list`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentList {
    /// Comment texts, in document order.
    pub comments: Vec<String>,
}

/// One callback per grammar construct.
///
/// Methods that can reject a construct return a [`Result`]; the first
/// error aborts the parse.
#[allow(unused_variables)]
pub trait SchemaBuilder {
    /// What patterns are built into.
    type Pattern;
    /// Source locations.
    type Location: Clone;
    /// The handle of a grammar scope.
    type Scope: Copy;
    /// Accumulates a `<data>` pattern's facets.
    type DataPattern;

    // -------------------------------------------------------------------------
    // Factories
    // -------------------------------------------------------------------------

    /// The builder for name classes.
    fn name_class_builder(&self) -> NameClassBuilder {
        NameClassBuilder::new()
    }

    /// Creates a location for diagnostics.
    fn make_location(&self, system_id: Option<&str>, line: u32, column: u32) -> Self::Location;

    /// Creates an annotation holder.
    fn make_annotations(&self, comments: Option<CommentList>) -> Annotations {
        Annotations
    }

    /// Creates a comment list, or `None` if comments are not tracked.
    fn make_comment_list(&self) -> Option<CommentList> {
        None
    }

    /// Returns true if the builder wants comments.
    fn uses_comments(&self) -> bool {
        false
    }

    // -------------------------------------------------------------------------
    // Combinators
    // -------------------------------------------------------------------------

    /// `<choice>`.
    ///
    /// # Errors
    /// Fails if `patterns` is empty.
    fn make_choice(
        &mut self,
        patterns: Vec<Self::Pattern>,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<group>`.
    ///
    /// # Errors
    /// Fails if `patterns` is empty.
    fn make_group(
        &mut self,
        patterns: Vec<Self::Pattern>,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<interleave>`.
    ///
    /// # Errors
    /// Fails if `patterns` is empty.
    fn make_interleave(
        &mut self,
        patterns: Vec<Self::Pattern>,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<oneOrMore>`.
    ///
    /// # Errors
    /// Builder specific.
    fn make_one_or_more(
        &mut self,
        pattern: Self::Pattern,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<zeroOrMore>`.
    ///
    /// # Errors
    /// Builder specific.
    fn make_zero_or_more(
        &mut self,
        pattern: Self::Pattern,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<optional>`.
    ///
    /// # Errors
    /// Builder specific.
    fn make_optional(
        &mut self,
        pattern: Self::Pattern,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<list>`.
    ///
    /// # Errors
    /// Builder specific.
    fn make_list(
        &mut self,
        pattern: Self::Pattern,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<mixed>`.
    ///
    /// # Errors
    /// Builder specific.
    fn make_mixed(
        &mut self,
        pattern: Self::Pattern,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    /// `<empty>`.
    fn make_empty(&mut self, location: Option<Self::Location>, annotations: Annotations)
    -> Self::Pattern;

    /// `<notAllowed>`.
    fn make_not_allowed(
        &mut self,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Self::Pattern;

    /// `<text>`.
    fn make_text(&mut self, location: Option<Self::Location>, annotations: Annotations)
    -> Self::Pattern;

    /// Stand-in for a construct the parser could not read.
    fn make_error_pattern(&mut self) -> Self::Pattern;

    /// `<attribute>`.
    ///
    /// # Errors
    /// Builder specific.
    fn make_attribute(
        &mut self,
        name_class: NameClass,
        pattern: Self::Pattern,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<element>`.
    ///
    /// # Errors
    /// Builder specific.
    fn make_element(
        &mut self,
        name_class: NameClass,
        pattern: Self::Pattern,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// Starts a `<data>` pattern.
    ///
    /// # Errors
    /// Builder specific.
    fn make_data_pattern_builder(
        &mut self,
        library: &str,
        type_name: &str,
        location: Option<Self::Location>,
    ) -> Result<Self::DataPattern>;

    /// `<value>`.
    ///
    /// # Errors
    /// Builder specific.
    fn make_value(
        &mut self,
        library: &str,
        type_name: &str,
        value: &str,
        namespace: &str,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    // -------------------------------------------------------------------------
    // Grammars
    // -------------------------------------------------------------------------

    /// Opens a `<grammar>` scope.
    fn make_grammar(&mut self, parent: Option<Self::Scope>) -> Self::Scope;

    /// `<define>` (and `<start>`, under the reserved start name).
    ///
    /// # Errors
    /// Fails on an invalid rule name.
    fn define(
        &mut self,
        scope: Self::Scope,
        name: &str,
        combine: Combine,
        pattern: Self::Pattern,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<()>;

    /// `<ref>`.
    ///
    /// # Errors
    /// Fails on an invalid rule name.
    fn make_ref(
        &mut self,
        scope: Self::Scope,
        name: &str,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<parentRef>`.
    ///
    /// # Errors
    /// Fails outside a nested grammar.
    fn make_parent_ref(
        &mut self,
        scope: Self::Scope,
        name: &str,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// Closes a `<grammar>`, yielding its start pattern.
    ///
    /// # Errors
    /// Fails if the grammar has no start rule.
    fn end_grammar(
        &mut self,
        scope: Self::Scope,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    /// `<externalRef>`: parses another grammar into this builder.
    ///
    /// # Errors
    /// Fails if the referenced grammar does not parse.
    fn make_external_ref(
        &mut self,
        current: &dyn Parseable<Self>,
        uri: &str,
        namespace: &str,
        scope: Option<Self::Scope>,
        location: Option<Self::Location>,
        annotations: Annotations,
    ) -> Result<Self::Pattern>;

    // -------------------------------------------------------------------------
    // Pass-through hooks
    // -------------------------------------------------------------------------

    /// Called on a pattern once all of its children are known.
    ///
    /// # Errors
    /// Builder specific.
    fn expand_pattern(&mut self, pattern: Self::Pattern) -> Result<Self::Pattern> {
        Ok(pattern)
    }

    /// Attaches annotations to a pattern.
    ///
    /// # Errors
    /// Builder specific.
    fn annotate(&mut self, pattern: Self::Pattern, annotations: Annotations) -> Result<Self::Pattern> {
        Ok(pattern)
    }

    /// Attaches trailing comments to a pattern.
    ///
    /// # Errors
    /// Builder specific.
    fn comment_after(
        &mut self,
        pattern: Self::Pattern,
        comments: Option<CommentList>,
    ) -> Result<Self::Pattern> {
        Ok(pattern)
    }
}

/// A grammar source that drives a [`SchemaBuilder`].
pub trait Parseable<B: SchemaBuilder + ?Sized> {
    /// Parses the grammar, returning its top-level pattern.
    ///
    /// # Errors
    /// Returns the first error raised by the grammar or the builder.
    fn parse(&self, builder: &mut B) -> Result<B::Pattern>;

    /// Parses the grammar at `uri` into `scope`. Unqualified names in it
    /// default to `namespace`.
    ///
    /// # Errors
    /// Returns the first error raised by the grammar or the builder.
    fn parse_external(
        &self,
        uri: &str,
        builder: &mut B,
        scope: Option<B::Scope>,
        namespace: &str,
    ) -> Result<B::Pattern>;
}

/// A closure is a grammar source without external references.
impl<B, F> Parseable<B> for F
where
    B: SchemaBuilder + ?Sized,
    F: Fn(&mut B) -> Result<B::Pattern>,
{
    fn parse(&self, builder: &mut B) -> Result<B::Pattern> {
        self(builder)
    }

    fn parse_external(
        &self,
        uri: &str,
        _builder: &mut B,
        _scope: Option<B::Scope>,
        _namespace: &str,
    ) -> Result<B::Pattern> {
        Err(Error::external_reference(uri, "no external grammars are available"))
    }
}
