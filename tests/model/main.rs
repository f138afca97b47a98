//! Integration tests for Layer 1: Model
//!
//! Tests for pattern node merging and two-phase compilation of rule graphs.

mod merge;
