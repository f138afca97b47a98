//! Compilation errors.
//!
//! Every failure is an [`Error`]: an [`ErrorKind`] saying what went wrong,
//! plus an optional [`ErrorContext`] naming the rules being compiled.

use std::fmt;

use thiserror::Error;

use crate::location::Location;

/// A failure while building or compiling a grammar.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where the compiler was when it went wrong.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// An error without context.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, context: None }
    }

    /// Notes that the error surfaced while compiling `rule`.
    ///
    /// Called on the way out, so the innermost rule comes first.
    #[must_use]
    pub fn in_rule(mut self, rule: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(ErrorContext::default)
            .stack
            .push(rule.into());
        self
    }

    /// Creates a schema build error.
    #[must_use]
    pub fn schema_build(message: impl Into<String>, location: Option<Location>) -> Self {
        Self::new(ErrorKind::SchemaBuild {
            message: message.into(),
            location,
        })
    }

    /// Creates an error for a failed external grammar reference.
    #[must_use]
    pub fn external_reference(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalReference {
            uri: uri.into(),
            message: message.into(),
        })
    }

    /// Creates a contract violation for a bad argument.
    ///
    /// `what` describes the defect (`"null"`, `"empty"`).
    #[must_use]
    pub fn contract_violation(what: &'static str, argument: Option<&str>) -> Self {
        Self::new(ErrorKind::ContractViolation {
            what,
            argument: argument.map(String::from),
        })
    }

    /// Creates an unresolved rule reference error.
    #[must_use]
    pub fn unresolved_reference(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedReference { name: name.into() })
    }

    /// Creates an error for an inline rule that splices itself.
    #[must_use]
    pub fn recursive_inline(rule: impl Into<String>) -> Self {
        Self::new(ErrorKind::RecursiveInline { rule: rule.into() })
    }

    /// Records where the offending construct was written. A position that
    /// is already known is kept.
    #[must_use]
    pub fn located(mut self, location: Option<&Location>) -> Self {
        if let Some(location) = location {
            self.context
                .get_or_insert_with(ErrorContext::default)
                .location
                .get_or_insert_with(|| location.clone());
        }
        self
    }

    /// The grammar position this error points at: the schema build location
    /// if there is one, otherwise the one recorded in the context.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        let own = match &self.kind {
            ErrorKind::SchemaBuild { location, .. } => location.as_ref(),
            _ => None,
        };
        own.or_else(|| self.context.as_ref()?.location.as_ref())
    }
}

/// What went wrong.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A malformed or unsupported grammar construct.
    #[error("schema build error{}: {message}", fmt_location(.location.as_ref()))]
    SchemaBuild {
        /// Description of the defect.
        message: String,
        /// Where the offending construct was declared.
        location: Option<Location>,
    },

    /// A grammar pulled in through `externalRef` failed to parse.
    #[error("failed to parse external grammar {uri}: {message}")]
    ExternalReference {
        /// The referenced grammar.
        uri: String,
        /// The underlying failure.
        message: String,
    },

    /// A caller handed in an argument that breaks the API contract.
    #[error("cannot handle {what}{} argument", fmt_argument(.argument.as_deref()))]
    ContractViolation {
        /// The kind of defect (`null`, `empty`, ...).
        what: &'static str,
        /// The offending argument name.
        argument: Option<String>,
    },

    /// A rule was referenced but never defined in its grammar.
    #[error("reference to undefined rule: {name}")]
    UnresolvedReference {
        /// The rule name.
        name: String,
    },

    /// An inline rule reaches itself without passing through an element.
    #[error("rule {rule} inlines itself without an intervening element")]
    RecursiveInline {
        /// The rule that loops.
        rule: String,
    },

    /// A broken compiler invariant.
    #[error("internal error: {0}")]
    Internal(String),
}

fn fmt_location(location: Option<&Location>) -> String {
    location.map(|l| format!(" at {l}")).unwrap_or_default()
}

fn fmt_argument(argument: Option<&str>) -> String {
    argument.map(|a| format!(" '{a}'")).unwrap_or_default()
}

/// The rules being compiled when an error surfaced.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The grammar position involved, when known.
    pub location: Option<Location>,
    /// Rule names, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// A context pointing at `location`.
    #[must_use]
    pub fn at(location: &Location) -> Self {
        Self {
            location: Some(location.clone()),
            stack: Vec::new(),
        }
    }

    /// Builder method to append an outer rule.
    #[must_use]
    pub fn with_frame(mut self, rule: impl Into<String>) -> Self {
        self.stack.push(rule.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "at {location}")?;
        }
        for rule in &self.stack {
            write!(f, "\n  in {rule}")?;
        }
        Ok(())
    }
}

/// Result of a fallible compiler operation.
pub type Result<T> = std::result::Result<T, Error>;
