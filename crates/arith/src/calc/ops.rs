//! Operator resolution shared by both calculators
//!
//! `+` and `-` are built in; every other symbol comes from the config.

use crate::argument::LazyArgument;
use crate::config::{BinaryOperator, Config, UnaryOperator};
use crate::error::CalcError;

/// A binary operator ready to apply.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BinaryOp<'c> {
    Add,
    Sub,
    Configured(&'c BinaryOperator),
}

impl<'c> BinaryOp<'c> {
    pub(crate) fn resolve(symbol: &str, config: &'c Config) -> Result<Self, CalcError> {
        match symbol {
            "+" => Ok(BinaryOp::Add),
            "-" => Ok(BinaryOp::Sub),
            _ => config
                .binary_operator(symbol)
                .map(BinaryOp::Configured)
                .ok_or_else(|| CalcError::UndefinedBinaryOperator(symbol.to_string())),
        }
    }

    pub(crate) fn apply(&self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            BinaryOp::Add => Ok(a + b),
            BinaryOp::Sub => Ok(a - b),
            BinaryOp::Configured(op) => op.apply(a, b),
        }
    }

    /// Left operand is evaluated before the right one.
    pub(crate) fn apply_lazy(
        &self,
        a: &dyn LazyArgument,
        b: &dyn LazyArgument,
    ) -> Result<f64, CalcError> {
        match self {
            BinaryOp::Configured(op) => op.apply_lazy(a, b),
            builtin => {
                let left = a.value()?;
                builtin.apply(left, b.value()?)
            }
        }
    }
}

/// A unary operator ready to apply.
#[derive(Debug, Clone, Copy)]
pub(crate) enum UnaryOp<'c> {
    Plus,
    Neg,
    Configured(&'c UnaryOperator),
}

impl<'c> UnaryOp<'c> {
    pub(crate) fn resolve(symbol: &str, config: &'c Config) -> Result<Self, CalcError> {
        match symbol {
            "+" => Ok(UnaryOp::Plus),
            "-" => Ok(UnaryOp::Neg),
            _ => config
                .unary_operator(symbol)
                .map(UnaryOp::Configured)
                .ok_or_else(|| CalcError::UndefinedUnaryOperator(symbol.to_string())),
        }
    }

    pub(crate) fn apply(&self, a: f64) -> Result<f64, CalcError> {
        match self {
            UnaryOp::Plus => Ok(a),
            UnaryOp::Neg => Ok(-a),
            UnaryOp::Configured(op) => op.apply(a),
        }
    }

    pub(crate) fn apply_lazy(&self, a: &dyn LazyArgument) -> Result<f64, CalcError> {
        match self {
            UnaryOp::Configured(op) => op.apply_lazy(a),
            builtin => builtin.apply(a.value()?),
        }
    }
}
