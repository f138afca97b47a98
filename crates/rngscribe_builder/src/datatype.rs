//! Datatype resolution.
//!
//! Grammars name their datatypes by `(library, type)` pairs. A
//! [`DatatypeResolver`] maps those pairs onto host [`ValueType`]s; anything
//! it does not recognize is written as text.

use rngscribe_foundation::{Location, ValueType};
use rngscribe_model::Leaf;

/// The W3C XML Schema datatype library URI.
pub const XSD_DATATYPES: &str = "http://www.w3.org/2001/XMLSchema-datatypes";

/// Maps a grammar datatype to a host value type.
pub trait DatatypeResolver {
    /// Returns the value type for `name` in `library`, or `None` if the
    /// datatype is unknown.
    fn resolve(&self, library: &str, name: &str) -> Option<ValueType>;

    /// Resolves a datatype, falling back to [`ValueType::Text`].
    fn resolve_or_text(&self, library: &str, name: &str) -> ValueType {
        self.resolve(library, name).unwrap_or(ValueType::Text)
    }
}

impl<F> DatatypeResolver for F
where
    F: Fn(&str, &str) -> Option<ValueType>,
{
    fn resolve(&self, library: &str, name: &str) -> Option<ValueType> {
        self(library, name)
    }
}

/// Resolver for the XML Schema datatype library.
///
/// The built-in RELAX NG library (empty URI) and every other library resolve
/// to nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct XsdDatatypes;

impl DatatypeResolver for XsdDatatypes {
    fn resolve(&self, library: &str, name: &str) -> Option<ValueType> {
        if library != XSD_DATATYPES {
            return None;
        }
        let ty = match name {
            "boolean" => ValueType::Boolean,
            "byte" => ValueType::Byte,
            "short" | "unsignedByte" => ValueType::Short,
            "int" | "unsignedShort" => ValueType::Int,
            "long" | "unsignedInt" => ValueType::Long,
            "integer" | "nonPositiveInteger" | "negativeInteger" | "nonNegativeInteger"
            | "positiveInteger" | "unsignedLong" => ValueType::Integer,
            "decimal" => ValueType::Decimal,
            "float" => ValueType::Float,
            "double" => ValueType::Double,
            "QName" => ValueType::QName,
            "date" | "dateTime" | "time" | "gYear" | "gYearMonth" | "gMonth" | "gMonthDay"
            | "gDay" => ValueType::Calendar,
            "duration" => ValueType::Duration,
            "base64Binary" | "hexBinary" => ValueType::Bytes,
            "anyURI" => ValueType::Uri,
            "NMTOKENS" | "IDREFS" | "ENTITIES" => ValueType::list(ValueType::Text),
            _ => ValueType::Text,
        };
        Some(ty)
    }
}

// =============================================================================
// Data Patterns
// =============================================================================

/// Collects a `<data>` pattern's facets before the pattern is built.
///
/// Facets restrict the lexical space, which the writer API cannot express,
/// so they are recorded but do not change the resulting node.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPatternBuilder {
    ty: ValueType,
    params: Vec<(String, String)>,
    location: Option<Location>,
}

impl DataPatternBuilder {
    /// Starts a data pattern of the given resolved type.
    #[must_use]
    pub fn new(ty: ValueType, location: Option<Location>) -> Self {
        Self {
            ty,
            params: Vec::new(),
            location,
        }
    }

    /// The resolved value type.
    #[must_use]
    pub fn value_type(&self) -> &ValueType {
        &self.ty
    }

    /// Records a facet.
    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// Facets recorded so far, in order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Finishes the pattern.
    #[must_use]
    pub fn make_pattern(self, location: Option<Location>) -> Leaf {
        Leaf::data(self.ty).at(location.or(self.location))
    }

    /// Finishes the pattern, ignoring the `<except>` clause.
    #[must_use]
    pub fn make_pattern_with_except(self, _except: Leaf, location: Option<Location>) -> Leaf {
        self.make_pattern(location)
    }
}
