//! What the compiler traces.

use std::fmt;

// =============================================================================
// Compile Phase
// =============================================================================

/// Phase of grammar compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CompilePhase {
    /// Parser callbacks are building pattern nodes.
    #[default]
    Build,
    /// Alternative names are propagated from inline rules.
    Prepare,
    /// Output types are allocated for non-inline rules and elements.
    Declare,
    /// Members are populated into declared types.
    Generate,
    /// Output locations are being resolved.
    Output,
}

impl fmt::Display for CompilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Prepare => write!(f, "prepare"),
            Self::Declare => write!(f, "declare"),
            Self::Generate => write!(f, "generate"),
            Self::Output => write!(f, "output"),
        }
    }
}

// =============================================================================
// Trace Event
// =============================================================================

/// A decision made by the compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A compilation phase has started.
    PhaseStart {
        /// The phase that started.
        phase: CompilePhase,
    },

    /// A compilation phase has ended.
    PhaseEnd {
        /// The phase that ended.
        phase: CompilePhase,
    },

    /// A grammar rule received (part of) its definition.
    RuleDefined {
        /// The rule name.
        rule: String,
        /// Index of the grammar scope that owns the rule.
        scope: u32,
    },

    /// An inline rule lent its name to its only child.
    RuleAliased {
        /// The inline rule.
        rule: String,
        /// What received the name.
        target: String,
    },

    /// An output type was allocated.
    TypeDeclared {
        /// The unique type name.
        name: String,
        /// The rule or element the type was declared for.
        origin: String,
    },

    /// An inline rule was spliced into a caller's type.
    RuleInlined {
        /// The inline rule.
        rule: String,
        /// The type receiving the rule's members.
        into: String,
    },

    /// A type's members were populated.
    MembersGenerated {
        /// The type name.
        type_name: String,
        /// Number of members after generation.
        count: usize,
    },

    /// An output location was requested from a resolver.
    OutputRequested {
        /// Namespace URI of the output.
        namespace: String,
        /// Suggested file name.
        file: String,
    },

    /// A resolver produced an output location.
    OutputResolved {
        /// Namespace URI of the output.
        namespace: String,
        /// Suggested file name.
        file: String,
        /// System id of the produced location.
        system_id: String,
    },

    /// A resolver chose to skip an output.
    OutputSkipped {
        /// Namespace URI of the output.
        namespace: String,
        /// Suggested file name.
        file: String,
    },
}

impl TraceEvent {
    /// The kebab-case name used for filtering and in JSON output.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PhaseStart { .. } => "phase-start",
            Self::PhaseEnd { .. } => "phase-end",
            Self::RuleDefined { .. } => "rule-defined",
            Self::RuleAliased { .. } => "rule-aliased",
            Self::TypeDeclared { .. } => "type-declared",
            Self::RuleInlined { .. } => "rule-inlined",
            Self::MembersGenerated { .. } => "members-generated",
            Self::OutputRequested { .. } => "output-requested",
            Self::OutputResolved { .. } => "output-resolved",
            Self::OutputSkipped { .. } => "output-skipped",
        }
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// An event stamped with its sequence number, phase and time.
#[derive(Clone, Debug)]
pub struct TraceRecord {
    /// Position in the sequence of events recorded by one tracer.
    pub id: u64,
    /// The phase during which this event occurred.
    pub phase: CompilePhase,
    /// Timestamp in nanoseconds since the tracer was created.
    pub timestamp_ns: u64,
    /// The trace event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, phase: CompilePhase, timestamp_ns: u64, event: TraceEvent) -> Self {
        Self {
            id,
            phase,
            timestamp_ns,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}
