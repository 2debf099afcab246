//! Shunting-yard parser producing postfix operations
//!
//! The parser walks the token stream once, keeping a stack of pending
//! brackets and operators. Operands go straight to the output; operators
//! wait on the stack until something of lower priority arrives.
//!
//! Prefix operators bind tighter than any binary operator, and postfix
//! operators tighter still: `-a!` is `-(a!)` and `-a ^ b` is `(-a) ^ b`.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{priority, Assoc, Config, Operator, UnaryPos};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::operation::{FunctionCall, Operation, Variable};

/// The result of parsing an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parsed {
    /// Operations in postfix order
    pub operations: Vec<Operation>,

    /// First occurrence of each variable, keyed by normalized name
    pub variables: IndexMap<String, Variable>,

    /// Lowest-arity call of each function, keyed by normalized name
    pub functions: IndexMap<String, FunctionCall>,
}

impl Parsed {
    /// Whether the expression was empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Variable names as written, in order of first appearance.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.values().map(|v| v.name.as_str()).collect()
    }

    /// Function names as written, in order of first completion.
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.values().map(|f| f.name.as_str()).collect()
    }
}

impl fmt::Display for Parsed {
    /// Space-separated postfix form, e.g. `1 2 + x *`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// Expression parser bound to a config.
///
/// # Example
///
/// ```
/// use arith::Parser;
///
/// let parsed = Parser::default().parse("2 * (x + 1)").unwrap();
/// assert_eq!(parsed.to_string(), "2 x 1 + *");
/// assert_eq!(parsed.variable_names(), vec!["x"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: Config,
}

impl Parser {
    /// Create a parser recognizing the operators of `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The config this parser reads operators from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse an infix expression into postfix operations.
    pub fn parse(&self, input: &str) -> Result<Parsed, ParseError> {
        parse(input, &self.config)
    }
}

/// Parse `input` with the operators of `config`.
pub fn parse(input: &str, config: &Config) -> Result<Parsed, ParseError> {
    let tokens = Lexer::new(config).tokenize(input);
    let parsed = ParseState::new(config, &tokens).run()?;
    tracing::debug!(
        input_len = input.len(),
        operations = parsed.operations.len(),
        variables = parsed.variables.len(),
        functions = parsed.functions.len(),
        "parsed expression"
    );
    Ok(parsed)
}

// ═══════════════════════════════════════════════════════════════════════
// Parse State
// ═══════════════════════════════════════════════════════════════════════

/// What the previous token left the parser expecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Operand,
    BracketOpen,
    Separator,
    Prefix,
    Binary,
}

impl Prev {
    fn expects_operand(self) -> bool {
        !matches!(self, Prev::Operand)
    }
}

#[derive(Debug)]
enum StackItem {
    Bracket {
        position: usize,
        function: Option<FunctionCall>,
        separators: usize,
    },
    Binary {
        symbol: String,
        priority: i32,
    },
    Prefix {
        symbol: String,
    },
}

/// How an operator symbol behaves.
#[derive(Debug, Clone, Copy)]
enum OpKind {
    Binary {
        priority: i32,
        assoc: Assoc,
        sign: bool,
    },
    Prefix,
    Postfix,
}

struct ParseState<'a> {
    config: &'a Config,
    tokens: &'a [Token<'a>],
    index: usize,
    prev: Prev,
    stack: Vec<StackItem>,
    output: Vec<Operation>,
    variables: IndexMap<String, Variable>,
    functions: IndexMap<String, FunctionCall>,
}

impl<'a> ParseState<'a> {
    fn new(config: &'a Config, tokens: &'a [Token<'a>]) -> Self {
        Self {
            config,
            tokens,
            index: 0,
            prev: Prev::Start,
            stack: Vec::new(),
            output: Vec::new(),
            variables: IndexMap::new(),
            functions: IndexMap::new(),
        }
    }

    fn run(mut self) -> Result<Parsed, ParseError> {
        while let Some(token) = self.tokens.get(self.index).copied() {
            self.index += 1;
            match token.kind {
                TokenKind::Number => self.number(token)?,
                TokenKind::Name => self.name(token)?,
                TokenKind::Operator => self.operator(token)?,
                TokenKind::BracketOpen => self.bracket_open(token)?,
                TokenKind::BracketClose => self.bracket_close(token)?,
                TokenKind::ParamSeparator => self.separator(token)?,
                TokenKind::Unrecognized => {
                    return Err(error(
                        ParseErrorKind::UnexpectedToken(token.value.to_string()),
                        &token,
                    ))
                }
            }
        }

        while let Some(item) = self.stack.pop() {
            match item {
                StackItem::Bracket { position, .. } => {
                    return Err(ParseError::new(ParseErrorKind::UnclosedBracket, position))
                }
                other => self.emit(other),
            }
        }

        Ok(Parsed {
            operations: self.output,
            variables: self.variables,
            functions: self.functions,
        })
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.index)
    }

    fn require_operand_slot(&self, token: &Token<'_>) -> Result<(), ParseError> {
        if self.prev.expects_operand() {
            Ok(())
        } else {
            Err(error(ParseErrorKind::MissingOperator, token))
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Operands
    // ═══════════════════════════════════════════════════════════════════

    fn number(&mut self, token: Token<'_>) -> Result<(), ParseError> {
        self.require_operand_slot(&token)?;
        // literals past f64::MAX would read back as `inf`
        let value = token
            .value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| error(ParseErrorKind::UnexpectedToken(token.value.to_string()), &token))?;
        self.output.push(Operation::number(value));
        self.prev = Prev::Operand;
        Ok(())
    }

    fn name(&mut self, token: Token<'_>) -> Result<(), ParseError> {
        self.require_operand_slot(&token)?;

        let is_variable = token.value.starts_with('$');
        let opens_call = matches!(self.peek(), Some(t) if t.kind == TokenKind::BracketOpen);

        if !is_variable && opens_call {
            let position = self.tokens[self.index].position;
            self.index += 1;
            self.stack.push(StackItem::Bracket {
                position,
                function: Some(FunctionCall::from_token(token.value)),
                separators: 0,
            });
            self.prev = Prev::BracketOpen;
            return Ok(());
        }

        if token.value.starts_with('@') {
            return Err(error(
                ParseErrorKind::FunctionCallExpected(token.value.to_string()),
                &token,
            ));
        }

        let var = Variable::new(token.value);
        self.variables
            .entry(var.normalized_name.clone())
            .or_insert_with(|| var.clone());
        self.output.push(Operation::Variable(var));
        self.prev = Prev::Operand;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Brackets and Separators
    // ═══════════════════════════════════════════════════════════════════

    fn bracket_open(&mut self, token: Token<'_>) -> Result<(), ParseError> {
        self.require_operand_slot(&token)?;
        if matches!(self.peek(), Some(t) if t.kind == TokenKind::BracketClose) {
            return Err(error(ParseErrorKind::EmptyBrackets, &token));
        }
        self.stack.push(StackItem::Bracket {
            position: token.position,
            function: None,
            separators: 0,
        });
        self.prev = Prev::BracketOpen;
        Ok(())
    }

    fn bracket_close(&mut self, token: Token<'_>) -> Result<(), ParseError> {
        let Some((function, separators)) = self.pop_to_bracket() else {
            return Err(error(ParseErrorKind::UnmatchedClosingBracket, &token));
        };

        match function {
            None if separators > 0 => {
                return Err(error(ParseErrorKind::SeparatorOutsideFunctionCall, &token));
            }
            None => {}
            Some(mut call) => {
                let arity = if self.prev == Prev::BracketOpen {
                    0
                } else {
                    separators + 1
                };
                call.arity = Some(arity);
                self.register_function(&call);
                self.output.push(Operation::FunctionCall(call));
            }
        }

        self.prev = Prev::Operand;
        Ok(())
    }

    fn separator(&mut self, token: Token<'_>) -> Result<(), ParseError> {
        let inside_brackets = self
            .stack
            .iter()
            .any(|item| matches!(item, StackItem::Bracket { .. }));
        if !inside_brackets {
            return Err(error(ParseErrorKind::SeparatorNotInsideBrackets, &token));
        }
        if matches!(self.prev, Prev::BracketOpen | Prev::Separator) {
            return Err(error(ParseErrorKind::EmptyExpressionBeforeSeparator, &token));
        }
        if matches!(self.peek(), Some(t) if t.kind == TokenKind::BracketClose) {
            return Err(error(
                ParseErrorKind::EmptyExpressionBeforeClosingBracket,
                &token,
            ));
        }

        while let Some(item) = self.stack.pop() {
            if let StackItem::Bracket {
                position,
                function,
                separators,
            } = item
            {
                self.stack.push(StackItem::Bracket {
                    position,
                    function,
                    separators: separators + 1,
                });
                break;
            }
            self.emit(item);
        }

        self.prev = Prev::Separator;
        Ok(())
    }

    /// Emit everything above the innermost bracket and remove it.
    fn pop_to_bracket(&mut self) -> Option<(Option<FunctionCall>, usize)> {
        while let Some(item) = self.stack.pop() {
            match item {
                StackItem::Bracket {
                    function,
                    separators,
                    ..
                } => return Some((function, separators)),
                other => self.emit(other),
            }
        }
        None
    }

    /// Keep the lowest-arity call per function; ties keep the first.
    fn register_function(&mut self, call: &FunctionCall) {
        match self.functions.get_mut(&call.normalized_name) {
            Some(existing) if call.arity < existing.arity => *existing = call.clone(),
            Some(_) => {}
            None => {
                self.functions
                    .insert(call.normalized_name.clone(), call.clone());
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Operators
    // ═══════════════════════════════════════════════════════════════════

    fn classify(&self, symbol: &str) -> Option<OpKind> {
        if symbol == "+" || symbol == "-" {
            return Some(OpKind::Binary {
                priority: priority::ADD,
                assoc: Assoc::Left,
                sign: true,
            });
        }
        match self.config.operator(symbol)? {
            Operator::Binary(op) => Some(OpKind::Binary {
                priority: op.priority(),
                assoc: op.assoc(),
                sign: false,
            }),
            Operator::Unary(op) => Some(match op.position() {
                UnaryPos::Prefix => OpKind::Prefix,
                UnaryPos::Postfix => OpKind::Postfix,
            }),
        }
    }

    /// Whether the next token can never begin an operand.
    ///
    /// Unrecognized tokens are left for the main loop to report.
    fn next_cannot_start_operand(&self) -> bool {
        let Some(next) = self.peek() else {
            return true;
        };
        match next.kind {
            TokenKind::BracketClose | TokenKind::ParamSeparator => true,
            TokenKind::Operator => matches!(
                self.classify(next.value),
                Some(OpKind::Binary { sign: false, .. } | OpKind::Postfix)
            ),
            _ => false,
        }
    }

    fn operator(&mut self, token: Token<'_>) -> Result<(), ParseError> {
        let symbol = token.value;
        let Some(kind) = self.classify(symbol) else {
            return Err(error(
                ParseErrorKind::UnexpectedToken(symbol.to_string()),
                &token,
            ));
        };

        if self.prev.expects_operand() {
            match kind {
                OpKind::Binary { sign: true, .. } | OpKind::Prefix => {
                    if self.next_cannot_start_operand() {
                        return Err(error(
                            ParseErrorKind::PrefixMissingArgument(symbol.to_string()),
                            &token,
                        ));
                    }
                    self.stack.push(StackItem::Prefix {
                        symbol: symbol.to_string(),
                    });
                    self.prev = Prev::Prefix;
                }
                OpKind::Binary { .. } => {
                    return Err(error(
                        ParseErrorKind::BinaryMissingFirstArgument(symbol.to_string()),
                        &token,
                    ));
                }
                OpKind::Postfix => {
                    return Err(error(
                        ParseErrorKind::PostfixMissingArgument(symbol.to_string()),
                        &token,
                    ));
                }
            }
            return Ok(());
        }

        match kind {
            OpKind::Prefix => Err(error(ParseErrorKind::MissingOperator, &token)),
            OpKind::Postfix => {
                self.output.push(Operation::unary(symbol));
                Ok(())
            }
            OpKind::Binary { priority, assoc, .. } => {
                if self.next_cannot_start_operand() {
                    return Err(error(
                        ParseErrorKind::BinaryMissingSecondArgument(symbol.to_string()),
                        &token,
                    ));
                }
                self.pop_for_binary(priority, assoc);
                self.stack.push(StackItem::Binary {
                    symbol: symbol.to_string(),
                    priority,
                });
                self.prev = Prev::Binary;
                Ok(())
            }
        }
    }

    fn pop_for_binary(&mut self, priority: i32, assoc: Assoc) {
        while let Some(top) = self.stack.last() {
            let pop = match top {
                StackItem::Prefix { .. } => true,
                StackItem::Binary { priority: pending, .. } => {
                    *pending > priority || (*pending == priority && assoc == Assoc::Left)
                }
                StackItem::Bracket { .. } => false,
            };
            if !pop {
                break;
            }
            if let Some(item) = self.stack.pop() {
                self.emit(item);
            }
        }
    }

    fn emit(&mut self, item: StackItem) {
        match item {
            StackItem::Binary { symbol, .. } => self.output.push(Operation::binary(&symbol)),
            StackItem::Prefix { symbol } => self.output.push(Operation::unary(&symbol)),
            StackItem::Bracket { .. } => {}
        }
    }
}

fn error(kind: ParseErrorKind, token: &Token<'_>) -> ParseError {
    ParseError::new(kind, token.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpn(input: &str) -> String {
        Parser::default().parse(input).unwrap().to_string()
    }

    #[test]
    fn test_empty_input() {
        let parsed = Parser::default().parse("   ").unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.to_string(), "");
    }

    #[test]
    fn test_priorities() {
        assert_eq!(rpn("1 + 2 * 3"), "1 2 3 * +");
        assert_eq!(rpn("(1 + 2) * 3"), "1 2 + 3 *");
        assert_eq!(rpn("1 - 2 - 3"), "1 2 - 3 -");
    }

    #[test]
    fn test_right_assoc() {
        let pow = crate::config::BinaryOperator::new("^", priority::POW, Assoc::Right, |a, b| {
            Ok(a.powf(b))
        })
        .unwrap();
        let parser = Parser::new(Config::default().with_operator(pow));
        assert_eq!(parser.parse("2 ^ 3 ^ 2").unwrap().to_string(), "2 3 2 ^ ^");
    }

    #[test]
    fn test_prefix_binds_tighter_than_binary() {
        assert_eq!(rpn("-a * b"), "a -(1) b *");
        assert_eq!(rpn("a * -b + c"), "a b -(1) * c +");
    }

    #[test]
    fn test_zero_arity_call() {
        assert_eq!(rpn("pi() * 2"), "pi(0) 2 *");
    }

    #[test]
    fn test_dollar_name_is_never_a_call() {
        let err = Parser::default().parse("$x(1)").unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::MissingOperator, 2));
    }

    #[test]
    fn test_at_name_requires_call() {
        let err = Parser::default().parse("1 + @f").unwrap_err();
        assert_eq!(err.to_string(), "Function call expected after \"@f\" at position 4");
        assert_eq!(rpn("@f(1)"), "@f(1)");
    }

    #[test]
    fn test_unclosed_bracket_reports_bracket_position() {
        let err = Parser::default().parse("1 + (2").unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::UnclosedBracket, 4));
    }
}
