//! Function definitions

use std::fmt;
use std::sync::Arc;

use crate::argument::{LazyArgument, ValueArgument};
use crate::error::{CalcError, ConfigError};
use crate::names::{assert_name, normalize_func};

/// Eager function body: receives evaluated arguments.
type EagerFnPtr = Arc<dyn Fn(&[f64]) -> Result<f64, CalcError> + Send + Sync>;

/// Lazy function body: receives unevaluated arguments.
type LazyFnPtr = Arc<dyn Fn(&[&dyn LazyArgument]) -> Result<f64, CalcError> + Send + Sync>;

/// The body of a function. Only reachable through the arity-checked calls.
#[derive(Clone)]
enum FuncBody {
    /// Arguments are evaluated before the call
    Eager(EagerFnPtr),

    /// Arguments are passed unevaluated
    Lazy(LazyFnPtr),
}

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Required arguments
    pub min: usize,

    /// Maximum arguments (`None` for variadic)
    pub max: Option<usize>,
}

impl Arity {
    /// Exactly `n` arguments.
    pub const fn exact(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// Between `min` and `max` arguments, inclusive.
    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// At least `min` arguments.
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }
}

/// A function available to expressions.
///
/// # Example
///
/// ```
/// use arith::{Arity, Func};
///
/// let hypot = Func::new("hypot", Arity::exact(2), |args| Ok(args[0].hypot(args[1]))).unwrap();
/// assert_eq!(hypot.normalized_name(), "HYPOT");
/// assert_eq!(hypot.call("hypot", &[3.0, 4.0]), Ok(5.0));
/// ```
#[derive(Clone)]
pub struct Func {
    name: String,
    normalized_name: String,
    arity: Arity,
    body: FuncBody,
}

impl Func {
    /// Create a function whose arguments are evaluated before the call.
    ///
    /// The body is only invoked with an argument count inside `arity`.
    pub fn new<F>(name: &str, arity: Arity, body: F) -> Result<Self, ConfigError>
    where
        F: Fn(&[f64]) -> Result<f64, CalcError> + Send + Sync + 'static,
    {
        Self::with_body(name, arity, FuncBody::Eager(Arc::new(body)))
    }

    /// Create a function whose arguments are passed unevaluated.
    pub fn lazy<F>(name: &str, arity: Arity, body: F) -> Result<Self, ConfigError>
    where
        F: Fn(&[&dyn LazyArgument]) -> Result<f64, CalcError> + Send + Sync + 'static,
    {
        Self::with_body(name, arity, FuncBody::Lazy(Arc::new(body)))
    }

    /// Create a zero-argument function returning a constant.
    pub fn constant(name: &str, value: f64) -> Result<Self, ConfigError> {
        Self::new(name, Arity::exact(0), move |_| Ok(value))
    }

    /// Wrap a plain `f64 -> f64` function.
    pub fn unary(name: &str, f: fn(f64) -> f64) -> Result<Self, ConfigError> {
        Self::new(name, Arity::exact(1), move |args| Ok(f(args[0])))
    }

    /// Wrap a plain `(f64, f64) -> f64` function.
    pub fn binary(name: &str, f: fn(f64, f64) -> f64) -> Result<Self, ConfigError> {
        Self::new(name, Arity::exact(2), move |args| Ok(f(args[0], args[1])))
    }

    fn with_body(name: &str, arity: Arity, body: FuncBody) -> Result<Self, ConfigError> {
        let normalized_name = normalize_func(name);
        assert_name(&normalized_name)?;
        if let Some(max) = arity.max {
            if max < arity.min {
                return Err(ConfigError::InvalidArity {
                    name: name.to_string(),
                    min: arity.min,
                    max,
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            normalized_name,
            arity,
            body,
        })
    }

    /// Name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upper-cased name used for lookups.
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// Accepted argument counts.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Number of required arguments.
    pub fn min_arity(&self) -> usize {
        self.arity.min
    }

    /// Whether arguments are passed unevaluated.
    pub fn is_lazy(&self) -> bool {
        matches!(self.body, FuncBody::Lazy(_))
    }

    /// Call with already evaluated arguments.
    ///
    /// `call_name` is the name as written in the expression, used in
    /// error messages.
    pub fn call(&self, call_name: &str, args: &[f64]) -> Result<f64, CalcError> {
        self.check_arity(call_name, args.len())?;
        match &self.body {
            FuncBody::Eager(f) => f(args),
            FuncBody::Lazy(f) => {
                let wrapped: Vec<ValueArgument> = args.iter().copied().map(ValueArgument).collect();
                let refs: Vec<&dyn LazyArgument> =
                    wrapped.iter().map(|a| a as &dyn LazyArgument).collect();
                f(&refs)
            }
        }
    }

    /// Call with unevaluated arguments.
    ///
    /// Eager functions evaluate every argument first, left to right.
    pub fn call_lazy(&self, call_name: &str, args: &[&dyn LazyArgument]) -> Result<f64, CalcError> {
        self.check_arity(call_name, args.len())?;
        match &self.body {
            FuncBody::Lazy(f) => f(args),
            FuncBody::Eager(f) => {
                let values = args
                    .iter()
                    .map(|a| a.value())
                    .collect::<Result<Vec<_>, _>>()?;
                f(&values)
            }
        }
    }

    fn check_arity(&self, call_name: &str, provided: usize) -> Result<(), CalcError> {
        if provided < self.arity.min {
            return Err(CalcError::InsufficientFunctionArguments {
                name: call_name.to_string(),
                expected: self.arity.min,
                provided,
            });
        }
        match self.arity.max {
            Some(max) if provided > max => Err(CalcError::TooManyFunctionArguments {
                name: call_name.to_string(),
                max,
                provided,
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("lazy", &self.is_lazy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_func_normalizes_name() {
        let f = Func::constant("@myConst", 1.0).unwrap();
        assert_eq!(f.name(), "@myConst");
        assert_eq!(f.normalized_name(), "MYCONST");
    }

    #[test]
    fn test_func_rejects_invalid_name() {
        let err = Func::constant("1abc", 1.0).unwrap_err();
        assert_eq!(err, ConfigError::InvalidName("1ABC".to_string()));
    }

    #[test]
    fn test_func_rejects_inverted_arity() {
        let err = Func::new("f", Arity::range(2, 1), |_| Ok(0.0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArity { min: 2, max: 1, .. }));
    }

    #[test]
    fn test_call_checks_arity() {
        let f = Func::unary("neg", |x| -x).unwrap();
        assert_eq!(f.call("neg", &[2.0]), Ok(-2.0));
        assert_eq!(
            f.call("neg", &[]),
            Err(CalcError::InsufficientFunctionArguments {
                name: "neg".to_string(),
                expected: 1,
                provided: 0
            })
        );
        assert_eq!(
            f.call("NEG", &[1.0, 2.0]),
            Err(CalcError::TooManyFunctionArguments {
                name: "NEG".to_string(),
                max: 1,
                provided: 2
            })
        );
    }

    #[test]
    fn test_builtins_never_see_short_argument_lists() {
        let config = crate::config::Config::default();
        for name in ["abs", "round", "log", "if", "defined"] {
            let func = config.function(name).unwrap();
            let err = func.call(name, &[]).unwrap_err();
            assert!(
                matches!(err, CalcError::InsufficientFunctionArguments { provided: 0, .. }),
                "{name}: {err}"
            );
            let err = func.call_lazy(name, &[]).unwrap_err();
            assert!(
                matches!(err, CalcError::InsufficientFunctionArguments { provided: 0, .. }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn test_variadic_accepts_any_count() {
        let sum = Func::new("sum", Arity::at_least(0), |args| Ok(args.iter().sum())).unwrap();
        assert_eq!(sum.call("sum", &[]), Ok(0.0));
        assert_eq!(sum.call("sum", &[1.0, 2.0, 3.0]), Ok(6.0));
    }

    #[test]
    fn test_lazy_func_called_with_values() {
        let first = Func::lazy("first", Arity::at_least(1), |args| args[0].value()).unwrap();
        assert!(first.is_lazy());
        assert_eq!(first.call("first", &[7.0, 8.0]), Ok(7.0));
    }

    #[test]
    fn test_eager_func_called_lazily_evaluates_all() {
        struct Failing;
        impl LazyArgument for Failing {
            fn value(&self) -> Result<f64, CalcError> {
                Err(CalcError::UndefinedVariable("x".to_string()))
            }
        }

        let add = Func::binary("add", |a, b| a + b).unwrap();
        let args: [&dyn LazyArgument; 2] = [&ValueArgument(1.0), &Failing];
        assert_eq!(
            add.call_lazy("add", &args),
            Err(CalcError::UndefinedVariable("x".to_string()))
        );
    }
}
