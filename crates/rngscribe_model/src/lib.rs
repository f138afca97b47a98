//! Pattern nodes and the type compiler for rngscribe.
//!
//! This crate provides:
//! - [`Leaf`] - Pattern nodes and the merge algebra
//! - [`Define`] / [`DefineArena`] - Named grammar rules
//! - [`NodeSet`] - The two-phase declare/generate compiler
//! - [`TypeModel`] - The generated writer types
//! - [`CompilerOptions`] - Compilation settings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod define;
pub mod leaf;
pub mod model;
pub mod node_set;

pub use config::CompilerOptions;
pub use define::{Define, DefineArena, DefineId, ProcessState, START, ScopeId};
pub use leaf::{AttributeNode, ElementNode, Leaf, LeafKind, RuleRef};
pub use model::{Member, MemberKind, OutputType, Returns, RuleKey, TypeId, TypeModel, TypeOrigin};
pub use node_set::NodeSet;
