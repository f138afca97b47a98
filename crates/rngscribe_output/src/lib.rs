//! Output-location resolution for rngscribe.
//!
//! This crate provides:
//! - [`OutputResolver`] / [`OutputSink`] - Where generated output goes
//! - [`CheckedResolver`] - Enforces the resolver contract on every call
//! - [`DirectoryResolver`] - Writes every namespace into one directory

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checked;
pub mod resolver;

pub use checked::CheckedResolver;
pub use resolver::{DirectoryResolver, OutputLocation, OutputResolver, OutputSink};
