//! Value types carried by text, value, and list patterns.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host value type that an attribute or leaf element accepts.
///
/// Datatype resolution maps schema datatype names onto these; anything the
/// resolver does not know becomes [`ValueType::Text`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueType {
    /// Free text.
    Text,
    /// Boolean.
    Boolean,
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Arbitrary precision integer.
    Integer,
    /// Arbitrary precision decimal.
    Decimal,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Qualified name.
    QName,
    /// Date, time, or date-time.
    Calendar,
    /// Time duration.
    Duration,
    /// Binary data (base64 or hex encoded on the wire).
    Bytes,
    /// URI reference.
    Uri,
    /// Whitespace-separated list of values.
    List(Box<ValueType>),
}

impl ValueType {
    /// Creates a list type with the given item type.
    #[must_use]
    pub fn list(item: ValueType) -> Self {
        Self::List(Box::new(item))
    }

    /// Returns true if this is the text type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Boolean => write!(f, "boolean"),
            Self::Byte => write!(f, "byte"),
            Self::Short => write!(f, "short"),
            Self::Int => write!(f, "int"),
            Self::Long => write!(f, "long"),
            Self::Integer => write!(f, "integer"),
            Self::Decimal => write!(f, "decimal"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::QName => write!(f, "qname"),
            Self::Calendar => write!(f, "calendar"),
            Self::Duration => write!(f, "duration"),
            Self::Bytes => write!(f, "bytes"),
            Self::Uri => write!(f, "uri"),
            Self::List(item) => write!(f, "list<{item}>"),
        }
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
