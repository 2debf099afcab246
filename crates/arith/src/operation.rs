//! Operations produced by the parser, in postfix (RPN) order

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::names::{assert_name, normalize_func, normalize_var};

/// A variable reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Name as written in the expression
    pub name: String,

    /// Upper-cased name without the `$` prefix
    pub normalized_name: String,
}

impl Variable {
    /// Create a variable reference.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            normalized_name: normalize_var(name),
        }
    }
}

/// A function call with its argument count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name as written in the expression
    pub name: String,

    /// Upper-cased name without the `@` prefix
    pub normalized_name: String,

    /// Number of arguments, `None` if unresolved
    pub arity: Option<usize>,
}

impl FunctionCall {
    /// Create a function call, validating the name.
    pub fn new(name: &str, arity: Option<usize>) -> Result<Self, ConfigError> {
        let normalized_name = normalize_func(name);
        assert_name(&normalized_name)?;
        Ok(Self {
            name: name.to_string(),
            normalized_name,
            arity,
        })
    }

    /// Create a call for a name the lexer already matched as an identifier.
    pub(crate) fn from_token(name: &str) -> Self {
        Self {
            name: name.to_string(),
            normalized_name: normalize_func(name),
            arity: None,
        }
    }
}

/// One step of a postfix operation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Push a constant
    Number {
        /// The constant
        value: f64,
    },

    /// Push a variable's value
    Variable(Variable),

    /// Pop `arity` values, push the function result
    FunctionCall(FunctionCall),

    /// Pop two values, push the result
    BinaryOperator {
        /// Operator symbol
        symbol: String,
    },

    /// Pop one value, push the result
    UnaryOperator {
        /// Operator symbol
        symbol: String,
    },

    /// Opening bracket; only exists while parsing
    Bracket,

    /// Argument separator; only exists while parsing
    ParamSeparator,
}

impl Operation {
    /// A number operation.
    pub fn number(value: f64) -> Self {
        Operation::Number { value }
    }

    /// A variable operation.
    pub fn variable(name: &str) -> Self {
        Operation::Variable(Variable::new(name))
    }

    /// A function call operation with a known arity.
    pub fn function(name: &str, arity: usize) -> Result<Self, ConfigError> {
        FunctionCall::new(name, Some(arity)).map(Operation::FunctionCall)
    }

    /// A binary operator operation.
    pub fn binary(symbol: &str) -> Self {
        Operation::BinaryOperator {
            symbol: symbol.to_string(),
        }
    }

    /// A unary operator operation.
    pub fn unary(symbol: &str) -> Self {
        Operation::UnaryOperator {
            symbol: symbol.to_string(),
        }
    }

    /// A human-readable name for the operation kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Operation::Number { .. } => "number",
            Operation::Variable(_) => "variable",
            Operation::FunctionCall(_) => "function call",
            Operation::BinaryOperator { .. } => "binary operator",
            Operation::UnaryOperator { .. } => "unary operator",
            Operation::Bracket => "bracket",
            Operation::ParamSeparator => "param separator",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Number { value } => write!(f, "{}", value),
            Operation::Variable(var) => write!(f, "{}", var.name),
            Operation::FunctionCall(call) => match call.arity {
                Some(arity) => write!(f, "{}({})", call.name, arity),
                None => write!(f, "{}(?)", call.name),
            },
            Operation::BinaryOperator { symbol } => write!(f, "{}", symbol),
            // Built-in sign operators are marked so they don't read as binary
            Operation::UnaryOperator { symbol } if symbol == "+" || symbol == "-" => {
                write!(f, "{}(1)", symbol)
            }
            Operation::UnaryOperator { symbol } => write!(f, "{}", symbol),
            Operation::Bracket | Operation::ParamSeparator => {
                write!(f, "(should not be in the stack)")
            }
        }
    }
}
