//! Static checks of a parsed expression against a config
//!
//! The validator answers "would this expression calculate?" without
//! calculating it: every variable must be provided, every function must
//! exist, and every function must be called with at least its minimum
//! number of arguments.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

use crate::config::{Config, Func};
use crate::error::ValidationError;
use crate::names::normalize_var;
use crate::operation::{FunctionCall, Operation, Variable};
use crate::parser::Parsed;

/// A problem found by the [`Validator`].
#[derive(Debug, Clone)]
pub enum Warning {
    /// Variables used by the expression but not provided
    MissingVariables(IndexMap<String, Variable>),

    /// Functions used by the expression but not configured
    MissingFunctions(IndexMap<String, FunctionCall>),

    /// A function called with fewer arguments than it requires
    MissingFunctionArguments {
        /// The configured function
        declaration: Func,
        /// The lowest-arity call in the expression
        call: FunctionCall,
    },
}

impl Warning {
    /// Human-readable description.
    pub fn message(&self) -> String {
        self.to_error().to_string()
    }

    /// Convert into the error [`Validator::assert_valid`] fails with.
    pub fn to_error(&self) -> ValidationError {
        match self {
            Warning::MissingVariables(vars) => {
                ValidationError::MissingVariables(vars.values().map(|v| v.name.clone()).collect())
            }
            Warning::MissingFunctions(calls) => ValidationError::MissingFunctions(
                calls
                    .values()
                    .map(|c| Operation::FunctionCall(c.clone()).to_string())
                    .collect(),
            ),
            Warning::MissingFunctionArguments { declaration, call } => {
                ValidationError::MissingFunctionArguments {
                    name: call.name.clone(),
                    expected: declaration.min_arity(),
                    provided: call.arity.unwrap_or(0),
                }
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error())
    }
}

impl PartialEq for Warning {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Warning::MissingVariables(a), Warning::MissingVariables(b)) => a == b,
            (Warning::MissingFunctions(a), Warning::MissingFunctions(b)) => a == b,
            (
                Warning::MissingFunctionArguments {
                    declaration: d1,
                    call: c1,
                },
                Warning::MissingFunctionArguments {
                    declaration: d2,
                    call: c2,
                },
            ) => {
                d1.normalized_name() == d2.normalized_name()
                    && d1.arity() == d2.arity()
                    && c1 == c2
            }
            _ => false,
        }
    }
}

/// Checks parsed expressions without calculating them.
///
/// # Example
///
/// ```
/// use arith::{Config, Parser, Validator};
///
/// let parsed = Parser::default().parse("a + b + $D").unwrap();
/// let err = Validator::assert_valid(&parsed, &Config::default(), ["a"]).unwrap_err();
/// assert_eq!(err.to_string(), "Missing variables: b, $D");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Collect every warning, in the order variables, functions, arities.
    pub fn validate<I>(parsed: &Parsed, config: &Config, variables: I) -> Vec<Warning>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let provided = normalized_set(variables);
        let all = warnings(parsed, config, &provided).collect();
        all
    }

    /// Whether the expression has no warnings. Stops at the first one.
    pub fn is_valid<I>(parsed: &Parsed, config: &Config, variables: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let provided = normalized_set(variables);
        let first = warnings(parsed, config, &provided).next();
        first.is_none()
    }

    /// Whether the expression has no warnings, also returning all of them.
    pub fn is_valid_with_warnings<I>(
        parsed: &Parsed,
        config: &Config,
        variables: I,
    ) -> (bool, Vec<Warning>)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let warnings = Self::validate(parsed, config, variables);
        (warnings.is_empty(), warnings)
    }

    /// Fail with the first warning.
    pub fn assert_valid<I>(parsed: &Parsed, config: &Config, variables: I) -> Result<(), ValidationError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let provided = normalized_set(variables);
        let first = warnings(parsed, config, &provided).next();
        match first {
            Some(warning) => {
                tracing::debug!(warning = %warning, "validation failed");
                Err(warning.to_error())
            }
            None => Ok(()),
        }
    }
}

fn normalized_set<I>(variables: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    variables
        .into_iter()
        .map(|v| normalize_var(v.as_ref()))
        .collect()
}

/// Lazily produce warnings so callers can stop at the first one.
fn warnings<'a>(
    parsed: &'a Parsed,
    config: &'a Config,
    provided: &'a HashSet<String>,
) -> impl Iterator<Item = Warning> + 'a {
    let functions = config.functions();

    let missing_variables = std::iter::once_with(move || {
        let missing: IndexMap<String, Variable> = parsed
            .variables
            .iter()
            .filter(|(key, _)| !provided.contains(*key))
            .map(|(key, var)| (key.clone(), var.clone()))
            .collect();
        (!missing.is_empty()).then_some(Warning::MissingVariables(missing))
    })
    .flatten();

    let missing_functions = std::iter::once_with(move || {
        let missing: IndexMap<String, FunctionCall> = parsed
            .functions
            .iter()
            .filter(|(key, _)| !functions.contains_key(*key))
            .map(|(key, call)| (key.clone(), call.clone()))
            .collect();
        (!missing.is_empty()).then_some(Warning::MissingFunctions(missing))
    })
    .flatten();

    let short_calls = parsed.functions.iter().filter_map(move |(key, call)| {
        let declaration = functions.get(key)?;
        let provided = call.arity.unwrap_or(0);
        (provided < declaration.min_arity()).then(|| Warning::MissingFunctionArguments {
            declaration: declaration.clone(),
            call: call.clone(),
        })
    });

    missing_variables.chain(missing_functions).chain(short_calls)
}
