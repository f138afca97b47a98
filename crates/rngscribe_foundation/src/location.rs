//! Source location tracking.
//!
//! `Location` records where a grammar construct was declared so that
//! schema build errors can point back at it.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position inside a grammar document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// System identifier (usually a file path or URI) of the grammar.
    pub system_id: Option<String>,
    /// 1-based line number; 0 when unknown.
    pub line: u32,
    /// 1-based column number; 0 when unknown.
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(system_id: Option<String>, line: u32, column: u32) -> Self {
        Self {
            system_id,
            line,
            column,
        }
    }

    /// Creates a location that only knows its line and column.
    #[must_use]
    pub const fn at(line: u32, column: u32) -> Self {
        Self {
            system_id: None,
            line,
            column,
        }
    }

    /// Returns true if neither a system id nor a position is known.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.system_id.is_none() && self.line == 0 && self.column == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.system_id.as_deref().unwrap_or("<unknown>"),
            self.line,
            self.column
        )
    }
}
