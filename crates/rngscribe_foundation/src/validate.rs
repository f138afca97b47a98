//! Argument validation helpers.
//!
//! These report API misuse as [`ErrorKind::ContractViolation`] so callers
//! can abort compilation with a message naming the bad argument.
//!
//! [`ErrorKind::ContractViolation`]: crate::ErrorKind::ContractViolation

use crate::error::{Error, ErrorKind, Result};

/// Checks that a string argument is non-empty.
///
/// # Errors
/// Returns a contract violation naming `argument` if `value` is empty.
pub fn not_empty<'a>(value: &'a str, argument: &str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(Error::contract_violation("empty", Some(argument)));
    }
    Ok(value)
}

/// Checks an arbitrary condition.
///
/// # Errors
/// Returns an internal error carrying `message` if `condition` is false.
pub fn is_true(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::Internal(message.into())))
    }
}
