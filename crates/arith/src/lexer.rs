//! Tokenizer for infix expressions
//!
//! Token positions are byte offsets into the input.

use crate::config::Config;

/// Token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `\d+(\.\d+)?`
    Number,

    /// `[$@]?[_A-Za-z][_A-Za-z0-9]*`
    Name,

    /// `+`, `-` or a configured operator symbol
    Operator,

    /// `(`
    BracketOpen,

    /// `)`
    BracketClose,

    /// `,`
    ParamSeparator,

    /// A character no other token starts with
    Unrecognized,
}

/// A token borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token category
    pub kind: TokenKind,

    /// Matched text
    pub value: &'a str,

    /// Byte offset of the first character
    pub position: usize,
}

/// Splits an expression into tokens.
///
/// # Example
///
/// ```
/// use arith::{Config, Lexer, TokenKind};
///
/// let config = Config::default();
/// let kinds: Vec<_> = Lexer::new(&config)
///     .tokenize("2 * abs(x)")
///     .iter()
///     .map(|t| t.kind)
///     .collect();
///
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Number,
///         TokenKind::Operator,
///         TokenKind::Name,
///         TokenKind::BracketOpen,
///         TokenKind::Name,
///         TokenKind::BracketClose,
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Lexer {
    /// Known operator symbols, longest first
    operators: Vec<String>,
}

impl Lexer {
    /// Create a lexer recognizing the operators of `config` plus `+`/`-`.
    pub fn new(config: &Config) -> Self {
        let mut operators: Vec<String> = config.operators().keys().cloned().collect();
        operators.push("+".to_string());
        operators.push("-".to_string());
        operators.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { operators }
    }

    /// Split `input` into tokens, skipping whitespace.
    pub fn tokenize<'a>(&self, input: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];
            let Some(c) = rest.chars().next() else {
                break;
            };

            if c.is_whitespace() {
                pos += c.len_utf8();
                continue;
            }

            let (kind, len) = self.scan(rest, c);
            tokens.push(Token {
                kind,
                value: &rest[..len],
                position: pos,
            });
            pos += len;
        }

        tracing::trace!(count = tokens.len(), "tokenized expression");
        tokens
    }

    fn scan(&self, rest: &str, first: char) -> (TokenKind, usize) {
        if first.is_ascii_digit() {
            return (TokenKind::Number, scan_number(rest));
        }

        match first {
            '(' => return (TokenKind::BracketOpen, 1),
            ')' => return (TokenKind::BracketClose, 1),
            ',' => return (TokenKind::ParamSeparator, 1),
            _ => {}
        }

        let operator = self
            .operators
            .iter()
            .find(|op| rest.starts_with(op.as_str()))
            .map(|op| op.len());
        let name = scan_name(rest);

        // A longer identifier wins so `android` is not `and` + `roid`
        match (operator, name) {
            (Some(op_len), Some(name_len)) if name_len > op_len => (TokenKind::Name, name_len),
            (Some(op_len), _) => (TokenKind::Operator, op_len),
            (None, Some(name_len)) => (TokenKind::Name, name_len),
            (None, None) => (TokenKind::Unrecognized, first.len_utf8()),
        }
    }
}

/// Length of `\d+(\.\d+)?` at the start of `s`.
fn scan_number(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if bytes.get(len) == Some(&b'.') {
        let fraction = bytes[len + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if fraction > 0 {
            len += 1 + fraction;
        }
    }
    len
}

/// Length of `[$@]?[_A-Za-z][_A-Za-z0-9]*` at the start of `s`.
fn scan_name(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let prefix = usize::from(matches!(bytes.first(), Some(b'$' | b'@')));
    match bytes.get(prefix) {
        Some(b) if *b == b'_' || b.is_ascii_alphabetic() => {}
        _ => return None,
    }
    let body = bytes[prefix..]
        .iter()
        .take_while(|b| **b == b'_' || b.is_ascii_alphanumeric())
        .count();
    Some(prefix + body)
}
