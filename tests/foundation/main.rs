//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: QName, ValueType, Error, validation, and tracing.

mod errors;
