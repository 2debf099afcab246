//! Name normalization for variables and functions
//!
//! Names are case-insensitive. Variables may carry a `$` prefix and
//! functions an `@` prefix; both are dropped before comparison.

use crate::error::ConfigError;

/// Normalize a variable name: strip one leading `$` and upper-case it.
pub fn normalize_var(name: &str) -> String {
    name.strip_prefix('$').unwrap_or(name).to_ascii_uppercase()
}

/// Normalize a function name: strip one leading `@` and upper-case it.
pub fn normalize_func(name: &str) -> String {
    name.strip_prefix('@').unwrap_or(name).to_ascii_uppercase()
}

/// Check whether a normalized name is a valid identifier.
pub fn is_valid_name(normalized: &str) -> bool {
    let mut chars = normalized.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Fail unless the normalized name is a valid identifier.
pub fn assert_name(normalized: &str) -> Result<(), ConfigError> {
    if is_valid_name(normalized) {
        Ok(())
    } else {
        Err(ConfigError::InvalidName(normalized.to_string()))
    }
}
