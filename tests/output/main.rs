//! Integration tests for Layer 3: Output
//!
//! Tests for resolving output locations through the contract-checking
//! wrapper.

mod checked;
