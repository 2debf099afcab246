//! Standard prelude with built-in functions and operators

use std::f64::consts;

use super::func::{Arity, Func};
use super::operator::{priority, Assoc, BinaryOperator, UnaryOperator, UnaryPos};
use super::Config;
use crate::argument::{from_bool, is_truthy, LazyArgument};
use crate::error::{CalcError, ConfigError};

impl Config {
    /// Load the standard functions and operators into this config.
    pub(crate) fn load_prelude(&mut self) -> Result<(), ConfigError> {
        // Generic
        self.add_function(Func::unary("abs", f64::abs)?);
        self.add_function(Func::unary("exp", f64::exp)?);
        self.add_function(Func::new("log", Arity::range(1, 2), builtin_log)?);
        self.add_function(Func::unary("log10", f64::log10)?);
        self.add_function(Func::unary("sqrt", f64::sqrt)?);

        // Trigonometric
        self.add_function(Func::unary("acos", f64::acos)?);
        self.add_function(Func::unary("asin", f64::asin)?);
        self.add_function(Func::unary("atan", f64::atan)?);
        self.add_function(Func::unary("cos", f64::cos)?);
        self.add_function(Func::unary("sin", f64::sin)?);
        self.add_function(Func::unary("tan", f64::tan)?);

        // Hyperbolic
        self.add_function(Func::unary("acosh", f64::acosh)?);
        self.add_function(Func::unary("asinh", f64::asinh)?);
        self.add_function(Func::unary("atanh", f64::atanh)?);
        self.add_function(Func::unary("cosh", f64::cosh)?);
        self.add_function(Func::unary("sinh", f64::sinh)?);
        self.add_function(Func::unary("tanh", f64::tanh)?);

        // Rounding
        self.add_function(Func::unary("ceil", f64::ceil)?);
        self.add_function(Func::unary("floor", f64::floor)?);
        self.add_function(Func::new("round", Arity::range(1, 2), builtin_round)?);

        // Conversion
        self.add_function(Func::unary("deg2rad", f64::to_radians)?);
        self.add_function(Func::unary("rad2deg", f64::to_degrees)?);

        // Constants
        self.add_function(Func::constant("pi", consts::PI)?);
        self.add_function(Func::constant("e", consts::E)?);
        self.add_function(Func::constant("true", 1.0)?);
        self.add_function(Func::constant("false", 0.0)?);
        self.add_function(Func::constant("nan", f64::NAN)?);
        self.add_function(Func::constant("inf", f64::INFINITY)?);

        // Lazy
        self.add_function(Func::lazy("if", Arity::exact(3), builtin_if)?);
        self.add_function(Func::lazy("defined", Arity::exact(1), builtin_defined)?);

        // Arithmetic
        self.add_operator(binary("*", priority::MUL, |a, b| Ok(a * b))?);
        self.add_operator(binary("/", priority::MUL, builtin_div)?);

        // Comparison
        self.add_operator(binary("<", priority::COMPARE, |a, b| Ok(from_bool(a < b)))?);
        self.add_operator(binary(">", priority::COMPARE, |a, b| Ok(from_bool(a > b)))?);
        self.add_operator(binary("<=", priority::COMPARE, |a, b| Ok(from_bool(a <= b)))?);
        self.add_operator(binary(">=", priority::COMPARE, |a, b| Ok(from_bool(a >= b)))?);
        self.add_operator(binary("=", priority::COMPARE, |a, b| Ok(from_bool(a == b)))?);
        self.add_operator(binary("==", priority::COMPARE, |a, b| Ok(from_bool(a == b)))?);
        self.add_operator(binary("!=", priority::COMPARE, |a, b| Ok(from_bool(a != b)))?);
        self.add_operator(binary("<>", priority::COMPARE, |a, b| Ok(from_bool(a != b)))?);

        // Logic
        for symbol in ["and", "AND"] {
            self.add_operator(BinaryOperator::lazy(symbol, priority::AND, Assoc::Left, builtin_and)?);
        }
        for symbol in ["or", "OR"] {
            self.add_operator(BinaryOperator::lazy(symbol, priority::OR, Assoc::Left, builtin_or)?);
        }
        for symbol in ["not", "NOT"] {
            self.add_operator(UnaryOperator::new(symbol, UnaryPos::Prefix, |a| {
                Ok(from_bool(!is_truthy(a)))
            })?);
        }

        Ok(())
    }
}

fn binary<F>(symbol: &str, priority: i32, body: F) -> Result<BinaryOperator, ConfigError>
where
    F: Fn(f64, f64) -> Result<f64, CalcError> + Send + Sync + 'static,
{
    BinaryOperator::new(symbol, priority, Assoc::Left, body)
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Implementations
// ═══════════════════════════════════════════════════════════════════════

/// `log(x)` is the natural logarithm, `log(x, base)` uses the given base.
fn builtin_log(args: &[f64]) -> Result<f64, CalcError> {
    match args {
        [x] => Ok(x.ln()),
        [x, base] => Ok(x.ln() / base.ln()),
        _ => unreachable!("arity is checked before the call"),
    }
}

/// `round(x, precision)`: half away from zero, precision truncated to an
/// integer and allowed to be negative.
fn builtin_round(args: &[f64]) -> Result<f64, CalcError> {
    let x = args[0];
    let precision = args.get(1).copied().unwrap_or(0.0).trunc();
    if precision == 0.0 {
        return Ok(x.round());
    }
    let factor = 10f64.powf(precision.abs());
    match (precision > 0.0, factor.is_finite()) {
        (true, true) => Ok((x * factor).round() / factor),
        (false, true) => Ok((x / factor).round() * factor),
        // finer than any f64 can represent
        (true, false) => Ok(x),
        (false, false) => Ok(0.0_f64.copysign(x)),
    }
}

fn builtin_div(a: f64, b: f64) -> Result<f64, CalcError> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(a / b)
}

fn builtin_if(args: &[&dyn LazyArgument]) -> Result<f64, CalcError> {
    if is_truthy(args[0].value()?) {
        args[1].value()
    } else {
        args[2].value()
    }
}

/// 1 if the argument evaluates, 0 if it refers to an undefined variable.
fn builtin_defined(args: &[&dyn LazyArgument]) -> Result<f64, CalcError> {
    match args[0].value() {
        Ok(_) => Ok(1.0),
        Err(CalcError::UndefinedVariable(_)) => Ok(0.0),
        Err(e) => Err(e),
    }
}

fn builtin_and(a: &dyn LazyArgument, b: &dyn LazyArgument) -> Result<f64, CalcError> {
    Ok(from_bool(is_truthy(a.value()?) && is_truthy(b.value()?)))
}

fn builtin_or(a: &dyn LazyArgument, b: &dyn LazyArgument) -> Result<f64, CalcError> {
    Ok(from_bool(is_truthy(a.value()?) || is_truthy(b.value()?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_with_base() {
        assert_eq!(builtin_log(&[1.0]), Ok(0.0));
        let v = builtin_log(&[8.0, 2.0]).unwrap();
        assert!((v - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_precision() {
        assert_eq!(builtin_round(&[2.5]), Ok(3.0));
        assert_eq!(builtin_round(&[-2.5]), Ok(-3.0));
        assert_eq!(builtin_round(&[1234.5678, 2.0]), Ok(1234.57));
        assert_eq!(builtin_round(&[1234.5678, -2.0]), Ok(1200.0));
        // precision is truncated
        assert_eq!(builtin_round(&[1.55, 1.9]), Ok(1.6));
        // factors beyond the f64 range
        assert_eq!(builtin_round(&[1.5, 308.0]), Ok(1.5));
        assert_eq!(builtin_round(&[1.5, 400.0]), Ok(1.5));
        assert_eq!(builtin_round(&[1234.0, -400.0]), Ok(0.0));
        let negative = builtin_round(&[-1234.0, -400.0]).unwrap();
        assert_eq!(negative, 0.0);
        assert!(negative.is_sign_negative());
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(builtin_div(1.0, 0.0), Err(CalcError::DivisionByZero));
        assert_eq!(builtin_div(1.0, 4.0), Ok(0.25));
    }

    #[test]
    fn test_defined_only_swallows_undefined_variables() {
        struct Undefined;
        impl LazyArgument for Undefined {
            fn value(&self) -> Result<f64, CalcError> {
                Err(CalcError::UndefinedVariable("x".to_string()))
            }
        }
        struct Broken;
        impl LazyArgument for Broken {
            fn value(&self) -> Result<f64, CalcError> {
                Err(CalcError::DivisionByZero)
            }
        }

        assert_eq!(builtin_defined(&[&Undefined]), Ok(0.0));
        assert_eq!(builtin_defined(&[&Broken]), Err(CalcError::DivisionByZero));
    }
}
