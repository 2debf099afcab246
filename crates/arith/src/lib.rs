//! # Arithmetic Parser
//!
//! A configurable parser and calculator for infix arithmetic expressions.
//!
//! Expressions are converted to postfix order by a shunting-yard parser and
//! then calculated either eagerly, on a value stack, or lazily, by
//! evaluating an expression tree on demand. A validator checks a parsed
//! expression against a config without calculating it.
//!
//! ## Architecture
//!
//! - **Config**: the registry of functions and operators
//! - **Lexer / Parser**: infix text to postfix [`Operation`]s, with
//!   positioned errors
//! - **Calculator / LazyCalculator**: postfix operations to an `f64`
//! - **Validator**: missing variables, functions and arguments
//!
//! ## Example
//!
//! ```
//! use arith::{Calculate, Calculator, Config, Vars};
//!
//! let config = Config::default();
//! let vars = Vars::from_pairs([("r", 2.0)]).unwrap();
//!
//! let area = Calculator::evaluate("round(pi() * r * r, 2)", &config, &vars).unwrap();
//! assert_eq!(area, 12.57);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod argument;
pub mod calc;
pub mod config;
pub mod error;
pub mod lexer;
pub mod names;
pub mod operation;
pub mod parser;
pub mod validator;
pub mod vars;

// Re-export main types
pub use argument::{LazyArgument, ValueArgument};
pub use calc::{Calculate, Calculator, LazyCalculator};
pub use config::{
    priority, Arity, Assoc, BinaryOperator, Config, Func, Operator, UnaryOperator, UnaryPos,
};
pub use error::{
    ArithError, CalcError, ConfigError, ParseError, ParseErrorKind, Result, ValidationError,
};
pub use lexer::{Lexer, Token, TokenKind};
pub use operation::{FunctionCall, Operation, Variable};
pub use parser::{Parsed, Parser};
pub use validator::{Validator, Warning};
pub use vars::Vars;

/// Arithmetic Parser version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
