//! Integration tests for Layer 2: Builder
//!
//! Tests for compiling grammars end to end through the parser callback
//! protocol.

mod grammars;
mod scenarios;
