//! Function and operator registry
//!
//! A [`Config`] decides which functions and operators an expression may
//! use. The lexer and parser read it to recognize operator symbols, the
//! calculators to execute them, and the validator to check names and
//! arities.

mod func;
mod operator;
mod prelude;

pub use func::{Arity, Func};
pub use operator::{
    assert_symbol, priority, Assoc, BinaryOperator, Operator, UnaryOperator, UnaryPos,
};

use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::names::normalize_func;

static DEFAULT_CONFIG: OnceLock<Config> = OnceLock::new();

/// The set of functions and operators available to expressions.
///
/// Functions are keyed by normalized name, operators by symbol. Both keep
/// insertion order. Adding an entry with an existing key replaces it.
///
/// Every mutator comes in two flavours: `add_*`/`remove_*` work on a
/// `&mut Config`, `with_*`/`without_*` consume and return it for chaining.
///
/// # Example
///
/// ```
/// use arith::{Config, Func};
///
/// let config = Config::default()
///     .with_function(Func::unary("mul2", |x| x * 2.0).unwrap())
///     .without_function("abs");
///
/// assert!(config.function("MUL2").is_some());
/// assert!(config.function("abs").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    functions: IndexMap<String, Func>,
    operators: IndexMap<String, Operator>,
}

impl Default for Config {
    /// The standard functions and operators.
    fn default() -> Self {
        DEFAULT_CONFIG.get_or_init(Self::build_default).clone()
    }
}

impl Config {
    /// Create a config with no functions and no operators.
    ///
    /// `+` and `-` are still available; they are not configurable.
    pub fn empty() -> Self {
        Self {
            functions: IndexMap::new(),
            operators: IndexMap::new(),
        }
    }

    fn build_default() -> Self {
        let mut config = Self::empty();
        config
            .load_prelude()
            .expect("prelude names and symbols are valid");
        tracing::debug!(
            functions = config.functions.len(),
            operators = config.operators.len(),
            "built default config"
        );
        config
    }

    // ═══════════════════════════════════════════════════════════════════
    // Functions
    // ═══════════════════════════════════════════════════════════════════

    /// All functions, keyed by normalized name.
    pub fn functions(&self) -> &IndexMap<String, Func> {
        &self.functions
    }

    /// Look up a function by name (any case, optional `@`).
    pub fn function(&self, name: &str) -> Option<&Func> {
        self.functions.get(&normalize_func(name))
    }

    /// Add or replace a function.
    pub fn add_function(&mut self, func: Func) -> &mut Self {
        self.functions.insert(func.normalized_name().to_string(), func);
        self
    }

    /// Add or replace several functions.
    pub fn add_functions(&mut self, funcs: impl IntoIterator<Item = Func>) -> &mut Self {
        for func in funcs {
            self.add_function(func);
        }
        self
    }

    /// Replace all functions.
    pub fn set_functions(&mut self, funcs: impl IntoIterator<Item = Func>) -> &mut Self {
        self.functions.clear();
        self.add_functions(funcs)
    }

    /// Remove a function by name. Unknown names are ignored.
    pub fn remove_function(&mut self, name: &str) -> &mut Self {
        self.functions.shift_remove(&normalize_func(name));
        self
    }

    /// Remove several functions by name.
    pub fn remove_functions<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for name in names {
            self.remove_function(name);
        }
        self
    }

    /// Remove all functions.
    pub fn clear_functions(&mut self) -> &mut Self {
        self.functions.clear();
        self
    }

    /// Chaining form of [`Config::add_function`].
    pub fn with_function(mut self, func: Func) -> Self {
        self.add_function(func);
        self
    }

    /// Chaining form of [`Config::add_functions`].
    pub fn with_functions(mut self, funcs: impl IntoIterator<Item = Func>) -> Self {
        self.add_functions(funcs);
        self
    }

    /// Chaining form of [`Config::remove_function`].
    pub fn without_function(mut self, name: &str) -> Self {
        self.remove_function(name);
        self
    }

    /// Chaining form of [`Config::clear_functions`].
    pub fn without_functions(mut self) -> Self {
        self.clear_functions();
        self
    }

    // ═══════════════════════════════════════════════════════════════════
    // Operators
    // ═══════════════════════════════════════════════════════════════════

    /// All operators, keyed by symbol.
    pub fn operators(&self) -> &IndexMap<String, Operator> {
        &self.operators
    }

    /// Look up an operator by symbol.
    pub fn operator(&self, symbol: &str) -> Option<&Operator> {
        self.operators.get(symbol)
    }

    /// Look up a binary operator by symbol.
    pub fn binary_operator(&self, symbol: &str) -> Option<&BinaryOperator> {
        match self.operators.get(symbol) {
            Some(Operator::Binary(op)) => Some(op),
            _ => None,
        }
    }

    /// Look up a unary operator by symbol.
    pub fn unary_operator(&self, symbol: &str) -> Option<&UnaryOperator> {
        match self.operators.get(symbol) {
            Some(Operator::Unary(op)) => Some(op),
            _ => None,
        }
    }

    /// Add or replace an operator.
    pub fn add_operator(&mut self, op: impl Into<Operator>) -> &mut Self {
        let op = op.into();
        self.operators.insert(op.symbol().to_string(), op);
        self
    }

    /// Add or replace several operators.
    pub fn add_operators(&mut self, ops: impl IntoIterator<Item = Operator>) -> &mut Self {
        for op in ops {
            self.add_operator(op);
        }
        self
    }

    /// Replace all operators.
    pub fn set_operators(&mut self, ops: impl IntoIterator<Item = Operator>) -> &mut Self {
        self.operators.clear();
        self.add_operators(ops)
    }

    /// Remove an operator by symbol. Unknown symbols are ignored.
    pub fn remove_operator(&mut self, symbol: &str) -> &mut Self {
        self.operators.shift_remove(symbol);
        self
    }

    /// Remove several operators by symbol.
    pub fn remove_operators<'a>(&mut self, symbols: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for symbol in symbols {
            self.remove_operator(symbol);
        }
        self
    }

    /// Remove all operators.
    pub fn clear_operators(&mut self) -> &mut Self {
        self.operators.clear();
        self
    }

    /// Chaining form of [`Config::add_operator`].
    pub fn with_operator(mut self, op: impl Into<Operator>) -> Self {
        self.add_operator(op);
        self
    }

    /// Chaining form of [`Config::add_operators`].
    pub fn with_operators(mut self, ops: impl IntoIterator<Item = Operator>) -> Self {
        self.add_operators(ops);
        self
    }

    /// Chaining form of [`Config::remove_operator`].
    pub fn without_operator(mut self, symbol: &str) -> Self {
        self.remove_operator(symbol);
        self
    }

    /// Chaining form of [`Config::clear_operators`].
    pub fn without_operators(mut self) -> Self {
        self.clear_operators();
        self
    }
}
