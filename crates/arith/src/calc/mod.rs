//! Calculation of parsed expressions

mod eager;
mod lazy;
mod ops;

pub use eager::Calculator;
pub use lazy::{LazyCalculator, DEFAULT_MAX_DEPTH};

use crate::config::Config;
use crate::error::{CalcError, ParseError};
use crate::operation::Operation;
use crate::parser::{self, Parsed};
use crate::vars::Vars;

/// Trait for calculating postfix operation sequences.
///
/// [`Calculator`] evaluates every operand up front; [`LazyCalculator`]
/// hands unevaluated operands to lazy functions and operators.
pub trait Calculate: Sized {
    /// Wrap an operation sequence and the config to calculate it with.
    fn new(operations: Vec<Operation>, config: Config) -> Self;

    /// The operation sequence.
    fn operations(&self) -> &[Operation];

    /// The config functions and operators are looked up in.
    fn config(&self) -> &Config;

    /// Calculate the expression with the given variable values.
    fn calc(&self, vars: &Vars) -> Result<f64, CalcError>;

    /// Build from the output of the parser.
    fn from_parsed(parsed: Parsed, config: Config) -> Self {
        Self::new(parsed.operations, config)
    }

    /// Parse `input` and wrap the result.
    fn parse(input: &str, config: &Config) -> Result<Self, ParseError> {
        let parsed = parser::parse(input, config)?;
        Ok(Self::from_parsed(parsed, config.clone()))
    }

    /// Parse and calculate in one step.
    ///
    /// # Example
    ///
    /// ```
    /// use arith::{Calculate, Calculator, Config, Vars};
    ///
    /// let vars = Vars::from_pairs([("x", 4.0)]).unwrap();
    /// let result = Calculator::evaluate("sqrt(x) * 3", &Config::default(), &vars).unwrap();
    /// assert_eq!(result, 6.0);
    /// ```
    fn evaluate(input: &str, config: &Config, vars: &Vars) -> crate::Result<f64> {
        Ok(Self::parse(input, config)?.calc(vars)?)
    }
}
