//! rngscribe - RELAX NG to fluent writer interface compiler
//!
//! This crate re-exports all layers of the rngscribe compiler for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: rngscribe_output     — Contract-checked output location resolution
//! Layer 2: rngscribe_builder    — Parser callbacks, name classes, datatypes, compile()
//! Layer 1: rngscribe_model      — Pattern nodes, rule registry, writer type model
//! Layer 0: rngscribe_foundation — Core types (QName, ValueType, Error, tracing)
//! ```

pub use rngscribe_builder as builder;
pub use rngscribe_foundation as foundation;
pub use rngscribe_model as model;
pub use rngscribe_output as output;

pub use rngscribe_builder::{CompiledSchema, GrammarBuilder, Parseable, SchemaBuilder, compile};
pub use rngscribe_foundation::{Error, ErrorKind, Result};
pub use rngscribe_model::{CompilerOptions, TypeModel};
pub use rngscribe_output::CheckedResolver;
