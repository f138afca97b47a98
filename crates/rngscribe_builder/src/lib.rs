//! Grammar builder and compilation entry point for rngscribe.
//!
//! This crate provides:
//! - [`SchemaBuilder`] / [`Parseable`] - The parser callback protocol
//! - [`GrammarBuilder`] - Turns parser callbacks into pattern nodes
//! - [`NameClass`] - Sets of attribute and element names
//! - [`DatatypeResolver`] - Datatype lookup, with [`XsdDatatypes`] as default
//! - [`Grammars`] - Grammar scopes and rule references
//! - [`compile`] - Parses and compiles a grammar in one call

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod compile;
pub mod datatype;
pub mod grammar;
pub mod name_class;
pub mod protocol;

pub use builder::GrammarBuilder;
pub use compile::{CompiledSchema, compile};
pub use datatype::{DataPatternBuilder, DatatypeResolver, XSD_DATATYPES, XsdDatatypes};
pub use grammar::{Combine, Grammars};
pub use name_class::{NameClass, NameClassBuilder};
pub use protocol::{Annotations, CommentList, Parseable, SchemaBuilder};
