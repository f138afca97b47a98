//! The rule registry and the two-phase compiler.
//!
//! A [`NodeSet`] holds every rule reachable from a grammar's entry rule and
//! turns them into a [`TypeModel`]:
//!
//! 1. **prepare** gives inline rules' single children their display names.
//! 2. **declare** allocates an empty output type for each materialized rule
//!    and for each element with structured content. The rule-to-type mapping
//!    exists before any content is looked at, so recursive rules resolve.
//! 3. **generate** fills each type with members. Inline rules are spliced
//!    into the type that references them; references to materialized rules
//!    become `extends` edges.

use std::collections::HashSet;

use rngscribe_foundation::{
    CompilePhase, Error, ErrorKind, Location, QName, Result, TraceEvent, Tracer, ValueType,
    validate,
};

use crate::config::CompilerOptions;
use crate::define::{DefineArena, DefineId, ProcessState};
use crate::leaf::{AttributeNode, ElementNode, Leaf, LeafKind, RuleRef};
use crate::model::{Member, MemberKind, Returns, RuleKey, TypeId, TypeModel, TypeOrigin};

// =============================================================================
// NodeSet
// =============================================================================

/// Every rule reachable from an entry rule, plus the types compiled so far.
#[derive(Debug)]
pub struct NodeSet {
    defines: DefineArena,
    entry: DefineId,
    order: Vec<DefineId>,
    inline: Vec<bool>,
    model: TypeModel,
    filled: HashSet<TypeId>,
    options: CompilerOptions,
}

impl NodeSet {
    /// Collects the rules reachable from `entry`, in discovery order.
    ///
    /// Every rule with exactly one child is inline, the entry rule included.
    /// The entry's writer type is then the type of whatever that child
    /// resolves to; see [`TypeModel::root`].
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` (located at the first reference to it)
    /// if a reachable rule was never defined, and `Internal` if `entry` is
    /// not in the arena.
    pub fn new(defines: DefineArena, entry: DefineId, options: CompilerOptions) -> Result<Self> {
        validate::is_true(
            defines.get(entry).is_some(),
            format!("unknown entry rule {entry:?}"),
        )?;

        let mut order = Vec::new();
        let mut visited = vec![false; defines.len()];
        let mut stack: Vec<(DefineId, Option<Location>)> = vec![(entry, None)];
        while let Some((id, referenced_at)) = stack.pop() {
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            let define = &defines[id];
            let Some(pattern) = &define.pattern else {
                return Err(Error::unresolved_reference(define.display_name())
                    .located(referenced_at.as_ref()));
            };
            order.push(id);

            let mut refs = Vec::new();
            pattern.for_each_ref(&mut |r, at| refs.push((r.define, at.cloned())));
            stack.extend(refs.into_iter().rev());
        }

        let inline = defines.iter().map(|(_, define)| define.is_inline()).collect();

        Ok(Self {
            defines,
            entry,
            order,
            inline,
            model: TypeModel::new(),
            filled: HashSet::new(),
            options,
        })
    }

    /// The entry rule.
    #[must_use]
    pub fn entry(&self) -> DefineId {
        self.entry
    }

    /// Reachable rules in discovery order.
    #[must_use]
    pub fn order(&self) -> &[DefineId] {
        &self.order
    }

    /// The rule arena.
    #[must_use]
    pub fn defines(&self) -> &DefineArena {
        &self.defines
    }

    /// The types compiled so far.
    #[must_use]
    pub fn model(&self) -> &TypeModel {
        &self.model
    }

    /// Returns true if the rule is spliced into its callers.
    #[must_use]
    pub fn is_inline(&self, id: DefineId) -> bool {
        self.inline.get(id.index()).copied().unwrap_or(false)
    }

    /// Runs every phase and returns the finished model.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`NodeSet::declare`] or
    /// [`NodeSet::generate`].
    pub fn compile(mut self, tracer: &mut Tracer) -> Result<TypeModel> {
        self.prepare(tracer);
        self.declare_all(tracer)?;
        self.generate_all(tracer)?;
        Ok(self.model)
    }

    // -------------------------------------------------------------------------
    // Prepare
    // -------------------------------------------------------------------------

    /// Hands each inline, non-start rule's name to its single child as a
    /// display name. Names already assigned are kept.
    pub fn prepare(&mut self, tracer: &mut Tracer) {
        tracer.phase_start(CompilePhase::Prepare);
        for &id in &self.order {
            if !self.inline[id.index()] || self.defines[id].is_start() {
                continue;
            }
            let name = self.defines[id].name.clone();
            let target = match self.defines[id].pattern.as_ref().map(|p| &p.kind) {
                Some(LeafKind::Ref(r)) => Some(self.defines[r.define].display_name().to_string()),
                _ => None,
            };

            let Some(pattern) = self.defines[id].pattern.as_mut() else {
                continue;
            };
            match &mut pattern.kind {
                LeafKind::Element(e) => {
                    e.alternative_name.get_or_insert(name);
                }
                LeafKind::Attribute(a) => {
                    a.alternative_name.get_or_insert(name);
                }
                LeafKind::Ref(r) => {
                    if r.alias.is_none() {
                        if tracer.is_enabled() {
                            tracer.record(TraceEvent::RuleAliased {
                                rule: name.clone(),
                                target: target.unwrap_or_default(),
                            });
                        }
                        r.alias = Some(name);
                    }
                }
                _ => {}
            }
        }
        tracer.phase_end();
    }

    // -------------------------------------------------------------------------
    // Declare
    // -------------------------------------------------------------------------

    /// Declares every reachable rule.
    ///
    /// # Errors
    ///
    /// See [`NodeSet::declare`].
    pub fn declare_all(&mut self, tracer: &mut Tracer) -> Result<()> {
        tracer.phase_start(CompilePhase::Declare);
        for i in 0..self.order.len() {
            let id = self.order[i];
            self.declare(id, tracer)?;
        }
        let root = self.writer_type(self.entry);
        self.model.set_root(root);
        tracer.phase_end();
        Ok(())
    }

    /// The type a writer for `id` starts from: the rule's own type, or for
    /// an inline rule, the type of its element or of the rule it refers to.
    fn writer_type(&self, mut id: DefineId) -> Option<TypeId> {
        let mut seen = HashSet::new();
        while seen.insert(id) {
            let define = self.defines.get(id)?;
            if define.output.is_some() {
                return define.output;
            }
            let mut pattern = define.pattern.as_ref()?;
            if let LeafKind::Element(e) = &pattern.kind {
                if e.output.is_some() {
                    return e.output;
                }
                // collapsed: the element writes the referenced rule's type
                pattern = &e.content;
            }
            match &pattern.kind {
                LeafKind::Ref(r) => id = r.define,
                _ => return None,
            }
        }
        None
    }

    /// Allocates the rule's output type (unless it is inline) and the types
    /// of its structured elements.
    ///
    /// Returns `false` if the rule was already declared.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if `id` is not in the arena.
    pub fn declare(&mut self, id: DefineId, tracer: &mut Tracer) -> Result<bool> {
        let define = self.defines.get(id).ok_or_else(|| unknown_rule(id))?;
        if define.state != ProcessState::Unprocessed {
            return Ok(false);
        }

        let output = if self.inline[id.index()] {
            None
        } else {
            let base = if define.is_start() {
                self.options.root_type_name.clone()
            } else {
                define.name.clone()
            };
            let key = RuleKey {
                scope: define.scope,
                name: define.name.clone(),
            };
            let origin = TypeOrigin::Rule(key);
            let ty = self.model.create_type(&base, origin.clone());
            trace_declared(tracer, &self.model, ty, &origin);
            Some(ty)
        };

        let mut structured = Vec::new();
        if let Some(pattern) = &define.pattern {
            pattern.for_each_element(&mut |e| {
                let shape = content_shape(&e.content, &self.defines, &self.inline);
                structured.push(matches!(shape, ContentShape::Structured).then(|| {
                    let base = e.alternative_name.as_deref().unwrap_or(&e.name.local);
                    (base.to_string(), e.name.clone())
                }));
            });
        }

        let mut element_types = Vec::with_capacity(structured.len());
        for slot in structured {
            element_types.push(slot.map(|(base, name)| {
                let origin = TypeOrigin::Element(name);
                let ty = self.model.create_type(&base, origin.clone());
                trace_declared(tracer, &self.model, ty, &origin);
                ty
            }));
        }

        let define = &mut self.defines[id];
        if let Some(pattern) = define.pattern.as_mut() {
            let mut element_types = element_types.into_iter();
            pattern.for_each_element_mut(&mut |e| e.output = element_types.next().flatten());
        }
        define.output = output;
        define.state = ProcessState::Declared;
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Generate
    // -------------------------------------------------------------------------

    /// Generates every reachable rule.
    ///
    /// # Errors
    ///
    /// See [`NodeSet::generate`].
    pub fn generate_all(&mut self, tracer: &mut Tracer) -> Result<()> {
        tracer.phase_start(CompilePhase::Generate);
        for i in 0..self.order.len() {
            let id = self.order[i];
            self.generate(id, tracer)?;
        }
        tracer.phase_end();
        Ok(())
    }

    /// Populates the rule's output type. Inline rules have no type of their
    /// own; their members appear at use sites, and only the types of their
    /// elements are filled here.
    ///
    /// Returns `false` if the rule was already generated.
    ///
    /// # Errors
    ///
    /// Returns `RecursiveInline` if inline rules splice into each other in a
    /// cycle, and `Internal` if the rule (or a rule it references) has not
    /// been declared.
    pub fn generate(&mut self, id: DefineId, tracer: &mut Tracer) -> Result<bool> {
        let define = self.defines.get(id).ok_or_else(|| unknown_rule(id))?;
        match define.state {
            ProcessState::Generated => return Ok(false),
            ProcessState::Unprocessed => {
                return Err(not_declared(define.display_name()));
            }
            ProcessState::Declared => {}
        }

        let mut generator = Generator {
            defines: &self.defines,
            inline: &self.inline,
            model: &mut self.model,
            filled: &mut self.filled,
            returns: if self.options.chain_methods {
                Returns::Owner
            } else {
                Returns::Nothing
            },
            tracer,
        };
        let filled = match (define.output, define.pattern.as_ref()) {
            (Some(ty), pattern) => generator.fill(ty, pattern),
            (None, Some(pattern)) => {
                let mut elements = Vec::new();
                outermost_elements(pattern, &mut elements);
                elements.into_iter().try_for_each(|e| match e.output {
                    Some(ty) => generator.fill(ty, Some(&e.content)),
                    None => Ok(()),
                })
            }
            (None, None) => Ok(()),
        };
        filled.map_err(|e| e.in_rule(define.display_name()))?;

        self.defines[id].state = ProcessState::Generated;
        Ok(true)
    }
}

/// Elements not nested inside another element.
fn outermost_elements<'a>(leaf: &'a Leaf, out: &mut Vec<&'a ElementNode>) {
    match &leaf.kind {
        LeafKind::Element(e) => out.push(e),
        LeafKind::List(item) => outermost_elements(item, out),
        LeafKind::Attribute(a) => outermost_elements(&a.content, out),
        LeafKind::Union(members) => {
            for member in members {
                outermost_elements(member, out);
            }
        }
        LeafKind::Empty | LeafKind::Data(_) | LeafKind::Value { .. } | LeafKind::Ref(_) => {}
    }
}

fn unknown_rule(id: DefineId) -> Error {
    Error::new(ErrorKind::Internal(format!("unknown rule {id:?}")))
}

fn not_declared(rule: &str) -> Error {
    Error::new(ErrorKind::Internal(format!(
        "rule {rule} was used before it was declared"
    )))
}

fn trace_declared(tracer: &mut Tracer, model: &TypeModel, ty: TypeId, origin: &TypeOrigin) {
    if tracer.is_enabled() {
        if let Some(output) = model.get(ty) {
            tracer.type_declared(&output.name, &origin.to_string());
        }
    }
}

// =============================================================================
// Element Content
// =============================================================================

/// How an element's content is represented on its owner type.
#[derive(Debug, PartialEq)]
enum ContentShape {
    /// No content: a parameterless member.
    Empty,
    /// Text only: a member taking one of these value types.
    Values(Vec<ValueType>),
    /// A single reference to a materialized rule: the member writes that
    /// rule's type.
    Collapsed(DefineId),
    /// Anything else: the element gets its own type.
    Structured,
}

fn content_shape(content: &Leaf, defines: &DefineArena, inline: &[bool]) -> ContentShape {
    if content.children().is_empty() {
        return ContentShape::Empty;
    }
    let mut values = Vec::new();
    if collect_values(content, defines, &mut Vec::new(), &mut values) {
        return if values.is_empty() {
            ContentShape::Empty
        } else {
            ContentShape::Values(values)
        };
    }
    if let LeafKind::Ref(r) = &content.kind {
        if !inline[r.define.index()] {
            return ContentShape::Collapsed(r.define);
        }
    }
    ContentShape::Structured
}

/// Collects the value types accepted by text-only content, following rule
/// references. Returns false as soon as markup is found.
fn collect_values(
    leaf: &Leaf,
    defines: &DefineArena,
    visiting: &mut Vec<DefineId>,
    out: &mut Vec<ValueType>,
) -> bool {
    match &leaf.kind {
        LeafKind::Empty => true,
        LeafKind::Data(ty) | LeafKind::Value { ty, .. } => {
            push_unique(out, ty.clone());
            true
        }
        LeafKind::List(item) => {
            let mut items = Vec::new();
            if !collect_values(item, defines, visiting, &mut items) {
                return false;
            }
            if items.is_empty() {
                items.push(ValueType::Text);
            }
            for ty in items {
                push_unique(out, ValueType::list(ty));
            }
            true
        }
        LeafKind::Union(members) => members
            .iter()
            .all(|m| collect_values(m, defines, visiting, out)),
        LeafKind::Ref(r) => {
            if visiting.contains(&r.define) {
                return true;
            }
            let Some(pattern) = defines.get(r.define).and_then(|d| d.pattern.as_ref()) else {
                return true;
            };
            visiting.push(r.define);
            let found = collect_values(pattern, defines, visiting, out);
            visiting.pop();
            found
        }
        LeafKind::Attribute(_) | LeafKind::Element(_) => false,
    }
}

fn push_unique(out: &mut Vec<ValueType>, ty: ValueType) {
    if !out.contains(&ty) {
        out.push(ty);
    }
}

// =============================================================================
// Generator
// =============================================================================

/// The type currently being filled.
struct Target {
    ty: TypeId,
    seen: HashSet<(MemberKind, QName)>,
    splicing: Vec<DefineId>,
}

impl Target {
    fn new(ty: TypeId) -> Self {
        Self {
            ty,
            seen: HashSet::new(),
            splicing: Vec::new(),
        }
    }
}

struct Generator<'a> {
    defines: &'a DefineArena,
    inline: &'a [bool],
    model: &'a mut TypeModel,
    filled: &'a mut HashSet<TypeId>,
    returns: Returns,
    tracer: &'a mut Tracer,
}

impl Generator<'_> {
    /// Generates `content` into a fresh type. Each type is filled once.
    fn fill(&mut self, ty: TypeId, content: Option<&Leaf>) -> Result<()> {
        if !self.filled.insert(ty) {
            return Ok(());
        }
        let mut target = Target::new(ty);
        if let Some(content) = content {
            self.leaf(content, &mut target, false)?;
        }

        if self.tracer.is_enabled() {
            if let Some(output) = self.model.get(ty) {
                let event = TraceEvent::MembersGenerated {
                    type_name: output.name.clone(),
                    count: output.members.len(),
                };
                self.tracer.record(event);
            }
        }
        Ok(())
    }

    fn leaf(&mut self, leaf: &Leaf, target: &mut Target, optional: bool) -> Result<()> {
        let optional = optional || leaf.optional;
        match &leaf.kind {
            LeafKind::Empty | LeafKind::Data(_) | LeafKind::Value { .. } | LeafKind::List(_) => {
                Ok(())
            }
            LeafKind::Union(members) => {
                for member in members {
                    self.leaf(member, target, optional)?;
                }
                Ok(())
            }
            LeafKind::Attribute(a) => {
                self.attribute(a, target, optional);
                Ok(())
            }
            LeafKind::Element(e) => self.element(e, target, optional),
            LeafKind::Ref(r) => self.reference(r, leaf.location.as_ref(), target, optional),
        }
    }

    fn attribute(&mut self, a: &AttributeNode, target: &mut Target, optional: bool) {
        if !target.seen.insert((MemberKind::Attribute, a.name.clone())) {
            return;
        }
        let mut values = Vec::new();
        collect_values(&a.content, self.defines, &mut Vec::new(), &mut values);
        if values.is_empty() {
            values.push(ValueType::Text);
        }
        self.push(
            target.ty,
            Member {
                kind: MemberKind::Attribute,
                name: a.name.clone(),
                alias: a.alternative_name.clone(),
                values,
                content: None,
                returns: self.returns,
                optional,
            },
        );
    }

    fn element(&mut self, e: &ElementNode, target: &mut Target, optional: bool) -> Result<()> {
        if !target.seen.insert((MemberKind::Element, e.name.clone())) {
            return Ok(());
        }

        let (values, content) = if let Some(ty) = e.output {
            self.fill(ty, Some(&e.content))?;
            (Vec::new(), Some(ty))
        } else {
            match content_shape(&e.content, self.defines, self.inline) {
                ContentShape::Empty => (Vec::new(), None),
                ContentShape::Values(values) => (values, None),
                ContentShape::Collapsed(id) => {
                    let define = &self.defines[id];
                    let ty = define
                        .output
                        .ok_or_else(|| not_declared(define.display_name()))?;
                    (Vec::new(), Some(ty))
                }
                ContentShape::Structured => {
                    return Err(Error::new(ErrorKind::Internal(format!(
                        "element {} has no declared type",
                        e.name
                    ))));
                }
            }
        };

        self.push(
            target.ty,
            Member {
                kind: MemberKind::Element,
                name: e.name.clone(),
                alias: e.alternative_name.clone(),
                values,
                content,
                returns: self.returns,
                optional,
            },
        );
        Ok(())
    }

    fn reference(
        &mut self,
        r: &RuleRef,
        at: Option<&Location>,
        target: &mut Target,
        optional: bool,
    ) -> Result<()> {
        let defines = self.defines;
        let define = &defines[r.define];

        if !self.inline[r.define.index()] {
            let ty = define
                .output
                .ok_or_else(|| not_declared(define.display_name()))?;
            if ty != target.ty {
                if let Some(owner) = self.model.get_mut(target.ty) {
                    owner.extends.insert(ty);
                }
            }
            return Ok(());
        }

        if target.splicing.contains(&r.define) {
            return Err(Error::recursive_inline(define.display_name()).located(at));
        }
        if self.tracer.is_enabled() {
            let into = self.model.get(target.ty).map(|t| t.name.clone());
            self.tracer
                .rule_inlined(define.display_name(), into.as_deref().unwrap_or("?"));
        }

        target.splicing.push(r.define);
        let result = match &define.pattern {
            Some(pattern) => self.leaf(pattern, target, optional),
            None => Ok(()),
        };
        target.splicing.pop();
        result
    }

    fn push(&mut self, ty: TypeId, member: Member) {
        if let Some(owner) = self.model.get_mut(ty) {
            owner.members.push(member);
        }
    }
}
