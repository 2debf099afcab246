//! Binary and unary operator definitions

use std::fmt;
use std::sync::Arc;

use crate::argument::{LazyArgument, ValueArgument};
use crate::error::{CalcError, ConfigError};

/// Standard binary operator priorities. Higher binds tighter.
pub mod priority {
    /// `or`
    pub const OR: i32 = 1000;
    /// `and`
    pub const AND: i32 = 2000;
    /// Comparisons
    pub const COMPARE: i32 = 3000;
    /// `+`, `-`
    pub const ADD: i32 = 4000;
    /// `*`, `/`
    pub const MUL: i32 = 5000;
    /// Exponentiation
    pub const POW: i32 = 6000;
}

/// Binary operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assoc {
    /// `a ~ b ~ c` is `(a ~ b) ~ c`
    #[default]
    Left,

    /// `a ~ b ~ c` is `a ~ (b ~ c)`
    Right,
}

/// Where a unary operator stands relative to its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnaryPos {
    /// `~x`
    Prefix,

    /// `x~`
    #[default]
    Postfix,
}

type EagerBinaryPtr = Arc<dyn Fn(f64, f64) -> Result<f64, CalcError> + Send + Sync>;
type LazyBinaryPtr =
    Arc<dyn Fn(&dyn LazyArgument, &dyn LazyArgument) -> Result<f64, CalcError> + Send + Sync>;
type EagerUnaryPtr = Arc<dyn Fn(f64) -> Result<f64, CalcError> + Send + Sync>;
type LazyUnaryPtr = Arc<dyn Fn(&dyn LazyArgument) -> Result<f64, CalcError> + Send + Sync>;

#[derive(Clone)]
enum BinaryBody {
    Eager(EagerBinaryPtr),
    Lazy(LazyBinaryPtr),
}

#[derive(Clone)]
enum UnaryBody {
    Eager(EagerUnaryPtr),
    Lazy(LazyUnaryPtr),
}

/// Validate an operator symbol.
///
/// `+` and `-` are built in; brackets and commas are syntax; digits, dots
/// and whitespace would clash with numbers and token boundaries.
pub fn assert_symbol(symbol: &str) -> Result<(), ConfigError> {
    if symbol.is_empty() {
        return Err(ConfigError::EmptyOperatorSymbol);
    }
    if symbol == "+" || symbol == "-" {
        return Err(ConfigError::ReservedPlusMinus);
    }
    if symbol.contains(['(', ')']) {
        return Err(ConfigError::ReservedBrackets);
    }
    if symbol.contains(',') {
        return Err(ConfigError::ReservedComma);
    }
    if symbol
        .chars()
        .any(|c| c == '.' || c.is_ascii_digit() || c.is_whitespace())
    {
        return Err(ConfigError::ForbiddenSymbolChars);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Binary Operators
// ═══════════════════════════════════════════════════════════════════════

/// A configurable binary operator.
///
/// # Example
///
/// ```
/// use arith::{priority, Assoc, BinaryOperator};
///
/// let pow = BinaryOperator::new("^", priority::POW, Assoc::Right, |a, b| Ok(a.powf(b))).unwrap();
/// assert_eq!(pow.apply(2.0, 10.0), Ok(1024.0));
/// ```
#[derive(Clone)]
pub struct BinaryOperator {
    symbol: String,
    priority: i32,
    assoc: Assoc,
    body: BinaryBody,
}

impl BinaryOperator {
    /// Create an operator whose operands are evaluated first.
    pub fn new<F>(symbol: &str, priority: i32, assoc: Assoc, body: F) -> Result<Self, ConfigError>
    where
        F: Fn(f64, f64) -> Result<f64, CalcError> + Send + Sync + 'static,
    {
        assert_symbol(symbol)?;
        Ok(Self {
            symbol: symbol.to_string(),
            priority,
            assoc,
            body: BinaryBody::Eager(Arc::new(body)),
        })
    }

    /// Create an operator whose operands are passed unevaluated.
    pub fn lazy<F>(symbol: &str, priority: i32, assoc: Assoc, body: F) -> Result<Self, ConfigError>
    where
        F: Fn(&dyn LazyArgument, &dyn LazyArgument) -> Result<f64, CalcError>
            + Send
            + Sync
            + 'static,
    {
        assert_symbol(symbol)?;
        Ok(Self {
            symbol: symbol.to_string(),
            priority,
            assoc,
            body: BinaryBody::Lazy(Arc::new(body)),
        })
    }

    /// Operator symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Binding priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Associativity.
    pub fn assoc(&self) -> Assoc {
        self.assoc
    }

    /// Whether operands are passed unevaluated.
    pub fn is_lazy(&self) -> bool {
        matches!(self.body, BinaryBody::Lazy(_))
    }

    /// Apply to evaluated operands.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, CalcError> {
        match &self.body {
            BinaryBody::Eager(f) => f(a, b),
            BinaryBody::Lazy(f) => f(&ValueArgument(a), &ValueArgument(b)),
        }
    }

    /// Apply to unevaluated operands.
    pub fn apply_lazy(&self, a: &dyn LazyArgument, b: &dyn LazyArgument) -> Result<f64, CalcError> {
        match &self.body {
            BinaryBody::Lazy(f) => f(a, b),
            BinaryBody::Eager(f) => f(a.value()?, b.value()?),
        }
    }
}

impl fmt::Debug for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOperator")
            .field("symbol", &self.symbol)
            .field("priority", &self.priority)
            .field("assoc", &self.assoc)
            .field("lazy", &self.is_lazy())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Unary Operators
// ═══════════════════════════════════════════════════════════════════════

/// A configurable unary operator.
#[derive(Clone)]
pub struct UnaryOperator {
    symbol: String,
    position: UnaryPos,
    body: UnaryBody,
}

impl UnaryOperator {
    /// Create an operator whose operand is evaluated first.
    pub fn new<F>(symbol: &str, position: UnaryPos, body: F) -> Result<Self, ConfigError>
    where
        F: Fn(f64) -> Result<f64, CalcError> + Send + Sync + 'static,
    {
        assert_symbol(symbol)?;
        Ok(Self {
            symbol: symbol.to_string(),
            position,
            body: UnaryBody::Eager(Arc::new(body)),
        })
    }

    /// Create an operator whose operand is passed unevaluated.
    pub fn lazy<F>(symbol: &str, position: UnaryPos, body: F) -> Result<Self, ConfigError>
    where
        F: Fn(&dyn LazyArgument) -> Result<f64, CalcError> + Send + Sync + 'static,
    {
        assert_symbol(symbol)?;
        Ok(Self {
            symbol: symbol.to_string(),
            position,
            body: UnaryBody::Lazy(Arc::new(body)),
        })
    }

    /// Operator symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Prefix or postfix.
    pub fn position(&self) -> UnaryPos {
        self.position
    }

    /// Whether the operand is passed unevaluated.
    pub fn is_lazy(&self) -> bool {
        matches!(self.body, UnaryBody::Lazy(_))
    }

    /// Apply to an evaluated operand.
    pub fn apply(&self, a: f64) -> Result<f64, CalcError> {
        match &self.body {
            UnaryBody::Eager(f) => f(a),
            UnaryBody::Lazy(f) => f(&ValueArgument(a)),
        }
    }

    /// Apply to an unevaluated operand.
    pub fn apply_lazy(&self, a: &dyn LazyArgument) -> Result<f64, CalcError> {
        match &self.body {
            UnaryBody::Lazy(f) => f(a),
            UnaryBody::Eager(f) => f(a.value()?),
        }
    }
}

impl fmt::Debug for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryOperator")
            .field("symbol", &self.symbol)
            .field("position", &self.position)
            .field("lazy", &self.is_lazy())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operator
// ═══════════════════════════════════════════════════════════════════════

/// Either kind of configured operator.
#[derive(Debug, Clone)]
pub enum Operator {
    /// Infix operator
    Binary(BinaryOperator),

    /// Prefix or postfix operator
    Unary(UnaryOperator),
}

impl Operator {
    /// Operator symbol.
    pub fn symbol(&self) -> &str {
        match self {
            Operator::Binary(op) => op.symbol(),
            Operator::Unary(op) => op.symbol(),
        }
    }
}

impl From<BinaryOperator> for Operator {
    fn from(op: BinaryOperator) -> Self {
        Operator::Binary(op)
    }
}

impl From<UnaryOperator> for Operator {
    fn from(op: UnaryOperator) -> Self {
        Operator::Unary(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(a: f64, b: f64) -> Result<f64, CalcError> {
        Ok(a + b)
    }

    #[test]
    fn test_symbol_rules() {
        assert_eq!(assert_symbol(""), Err(ConfigError::EmptyOperatorSymbol));
        assert_eq!(assert_symbol("+"), Err(ConfigError::ReservedPlusMinus));
        assert_eq!(assert_symbol("-"), Err(ConfigError::ReservedPlusMinus));
        assert_eq!(assert_symbol("("), Err(ConfigError::ReservedBrackets));
        assert_eq!(assert_symbol("a)"), Err(ConfigError::ReservedBrackets));
        assert_eq!(assert_symbol(","), Err(ConfigError::ReservedComma));
        assert_eq!(assert_symbol("0 ."), Err(ConfigError::ForbiddenSymbolChars));
        assert_eq!(assert_symbol("a b"), Err(ConfigError::ForbiddenSymbolChars));
        assert_eq!(assert_symbol("**"), Ok(()));
        assert_eq!(assert_symbol("+="), Ok(()));
        assert_eq!(assert_symbol("¿"), Ok(()));
    }

    #[test]
    fn test_binary_operator_rejects_reserved() {
        let err = BinaryOperator::new("+", priority::ADD, Assoc::Left, add).unwrap_err();
        assert_eq!(err.to_string(), "+ and - are reserved and cannot be configured");
    }

    #[test]
    fn test_lazy_binary_applied_to_values() {
        let or = BinaryOperator::lazy("||", priority::OR, Assoc::Left, |a, b| {
            let v = a.value()?;
            if v != 0.0 {
                Ok(v)
            } else {
                b.value()
            }
        })
        .unwrap();
        assert!(or.is_lazy());
        assert_eq!(or.apply(0.0, 3.0), Ok(3.0));
        assert_eq!(or.apply(2.0, 3.0), Ok(2.0));
    }

    #[test]
    fn test_unary_defaults_to_postfix() {
        assert_eq!(UnaryPos::default(), UnaryPos::Postfix);
        assert_eq!(Assoc::default(), Assoc::Left);
    }

    #[test]
    fn test_operator_symbol() {
        let op: Operator = UnaryOperator::new("!", UnaryPos::Postfix, |a| Ok(a + 1.0))
            .unwrap()
            .into();
        assert_eq!(op.symbol(), "!");
    }
}
