//! Error types for parsing, configuration, calculation and validation

use thiserror::Error;

/// Main error type for arith operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArithError {
    /// The expression could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A function or operator definition was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The expression could not be calculated
    #[error(transparent)]
    Calc(#[from] CalcError),

    /// The expression did not pass validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for arith operations
pub type Result<T> = std::result::Result<T, ArithError>;

// ═══════════════════════════════════════════════════════════════════════
// Parse Errors
// ═══════════════════════════════════════════════════════════════════════

/// A parse failure with the byte offset where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at position {position}")]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,

    /// Byte offset into the input
    pub position: usize,
}

impl ParseError {
    /// Create a parse error at the given byte offset.
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// The reason a parse failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A character no token starts with
    #[error("Unexpected \"{0}\"")]
    UnexpectedToken(String),

    /// `()` outside of a function call
    #[error("Empty brackets")]
    EmptyBrackets,

    /// `)` without a matching `(`
    #[error("Unmatched closing bracket")]
    UnmatchedClosingBracket,

    /// `(` that is never closed
    #[error("Probably invalid operator combination")]
    UnclosedBracket,

    /// Binary operator where an operand was expected
    #[error("Binary operator ({0}) missing first argument")]
    BinaryMissingFirstArgument(String),

    /// Binary operator not followed by an operand
    #[error("Binary operator ({0}) missing second argument")]
    BinaryMissingSecondArgument(String),

    /// Prefix operator not followed by an operand
    #[error("Unary prefix operator ({0}) missing its argument")]
    PrefixMissingArgument(String),

    /// Postfix operator not preceded by an operand
    #[error("Unary postfix operator ({0}) missing its argument")]
    PostfixMissingArgument(String),

    /// Two operands in a row
    #[error("Missing operator")]
    MissingOperator,

    /// `,` at the top level
    #[error("Param separator not inside brackets")]
    SeparatorNotInsideBrackets,

    /// `,` inside plain (non-call) brackets
    #[error("Param separator outside of function call")]
    SeparatorOutsideFunctionCall,

    /// `,` directly after `(` or another `,`
    #[error("Empty expression before param separator")]
    EmptyExpressionBeforeSeparator,

    /// `,` directly before `)`
    #[error("Empty expression before closing bracket")]
    EmptyExpressionBeforeClosingBracket,

    /// `@name` that is not followed by an argument list
    #[error("Function call expected after \"{0}\"")]
    FunctionCallExpected(String),
}

// ═══════════════════════════════════════════════════════════════════════
// Configuration Errors
// ═══════════════════════════════════════════════════════════════════════

/// Errors raised while defining functions and operators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Function or variable name does not match `[_A-Za-z][_A-Za-z0-9]*`
    #[error("Invalid variable or function name: {0}")]
    InvalidName(String),

    /// Operator symbol is `""`
    #[error("Operator symbol must not be an empty string")]
    EmptyOperatorSymbol,

    /// Operator symbol is `+` or `-`
    #[error("+ and - are reserved and cannot be configured")]
    ReservedPlusMinus,

    /// Operator symbol contains a bracket
    #[error("Brackets ( and ) are reserved and cannot be configured")]
    ReservedBrackets,

    /// Operator symbol contains a comma
    #[error("Comma (,) is reserved and cannot be configured")]
    ReservedComma,

    /// Operator symbol contains a digit, a dot or whitespace
    #[error("Operator symbol must not contain digits, dots, and spaces")]
    ForbiddenSymbolChars,

    /// Arity with `max < min`
    #[error("Invalid arity for {name}: maximum {max} is below minimum {min}")]
    InvalidArity {
        /// Function name
        name: String,
        /// Declared minimum
        min: usize,
        /// Declared maximum
        max: usize,
    },
}

// ═══════════════════════════════════════════════════════════════════════
// Calculation Errors
// ═══════════════════════════════════════════════════════════════════════

/// Errors raised while calculating an operation sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// The stack did not end up with exactly one value
    #[error("Operation sequence is invalid")]
    InvalidSequence,

    /// A parse-only marker reached the calculator
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A function call without a resolved arity
    #[error("Invalid function arity, likely parser failure: {0}")]
    InvalidFunctionArity(String),

    /// Stack underflow while collecting function arguments
    #[error("Not enough arguments for function call: {0}")]
    NotEnoughFunctionArguments(String),

    /// Stack underflow for a binary operator
    #[error("Not enough arguments for binary operator: {0}")]
    NotEnoughBinaryArguments(String),

    /// Stack underflow for a unary operator
    #[error("Not enough arguments for unary operator: {0}")]
    NotEnoughUnaryArguments(String),

    /// Binary operator missing from the config
    #[error("Undefined binary operator: {0}")]
    UndefinedBinaryOperator(String),

    /// Unary operator missing from the config
    #[error("Undefined unary operator: {0}")]
    UndefinedUnaryOperator(String),

    /// Function missing from the config
    #[error("Undefined function: {0}")]
    UndefinedFunction(String),

    /// Variable missing from the provided values
    #[error("Variable {0} is not defined")]
    UndefinedVariable(String),

    /// Variable name that can never appear in an expression
    #[error("Invalid variable name: {0}")]
    InvalidVariableName(String),

    /// Two variables normalizing to the same name
    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),

    /// Function called with fewer arguments than it requires
    #[error("Insufficient arguments for function {name}(): {expected} expected but only {provided} provided")]
    InsufficientFunctionArguments {
        /// Function name as written in the expression
        name: String,
        /// Declared minimum
        expected: usize,
        /// Arguments passed
        provided: usize,
    },

    /// Function called with more arguments than it accepts
    #[error("Too many arguments for function {name}(): at most {max} expected but {provided} provided")]
    TooManyFunctionArguments {
        /// Function name as written in the expression
        name: String,
        /// Declared maximum
        max: usize,
        /// Arguments passed
        provided: usize,
    },

    /// Division with a zero divisor
    #[error("Division by zero")]
    DivisionByZero,

    /// Lazy expression tree exceeds the depth limit
    #[error("Expression is too deeply nested: depth {depth} exceeds the limit of {max}")]
    TooDeep {
        /// Depth reached
        depth: usize,
        /// Configured limit
        max: usize,
    },

    /// Error raised by a user-supplied callable
    #[error("{0}")]
    Custom(String),
}

impl CalcError {
    /// Whether this error is caused by the values or functions available at
    /// call time, rather than by a malformed operation sequence.
    pub fn is_call_error(&self) -> bool {
        matches!(
            self,
            CalcError::UndefinedFunction(_)
                | CalcError::UndefinedVariable(_)
                | CalcError::InvalidVariableName(_)
                | CalcError::DuplicateVariable(_)
                | CalcError::InsufficientFunctionArguments { .. }
                | CalcError::TooManyFunctionArguments { .. }
                | CalcError::DivisionByZero
                | CalcError::Custom(_)
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Validation Errors
// ═══════════════════════════════════════════════════════════════════════

/// Errors raised by [`crate::Validator::assert_valid`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Variables used by the expression but not provided
    #[error("Missing variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    /// Functions used by the expression but not configured
    #[error("Missing functions: {}", .0.join(", "))]
    MissingFunctions(Vec<String>),

    /// Function called with fewer arguments than it requires
    #[error("Insufficient arguments for function {name}(): {expected} expected but only {provided} provided")]
    MissingFunctionArguments {
        /// Function name as written in the expression
        name: String,
        /// Declared minimum
        expected: usize,
        /// Lowest arity found in the expression
        provided: usize,
    },
}
