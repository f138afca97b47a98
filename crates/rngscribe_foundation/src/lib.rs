//! Core types shared by every rngscribe layer.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`Location`] - Where a grammar construct was declared
//! - [`QName`] - Namespace-qualified attribute and element names
//! - [`ValueType`] - Host value types accepted by generated members
//! - [`validate`] - Argument contract checks
//! - [`trace`] - Compilation tracing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod location;
pub mod name;
pub mod trace;
pub mod types;
pub mod validate;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use location::Location;
pub use name::QName;
pub use trace::{CompilePhase, TraceEvent, Tracer, TracerConfig};
pub use types::ValueType;
