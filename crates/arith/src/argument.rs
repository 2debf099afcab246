//! Arguments handed to lazy functions and operators

use crate::error::CalcError;

/// An operand that is only evaluated when asked for.
///
/// Lazy callables receive their operands as `&dyn LazyArgument` and decide
/// themselves whether (and how often) to evaluate them. Errors raised by
/// the operand, such as an undefined variable, surface from [`value`] and
/// may be caught by the callable.
///
/// [`value`]: LazyArgument::value
pub trait LazyArgument {
    /// Evaluate the operand.
    fn value(&self) -> Result<f64, CalcError>;
}

/// An operand whose value is already known.
///
/// The eager calculator wraps every operand in this before calling a lazy
/// callable, so nothing is actually deferred there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueArgument(pub f64);

impl LazyArgument for ValueArgument {
    fn value(&self) -> Result<f64, CalcError> {
        Ok(self.0)
    }
}

/// Truthiness of a calculated value: anything but zero (NaN included).
pub fn is_truthy(value: f64) -> bool {
    value != 0.0
}

/// Convert a boolean into the `1`/`0` convention used by comparisons.
pub fn from_bool(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
