//! Eager stack-machine calculator

use super::ops::{BinaryOp, UnaryOp};
use super::Calculate;
use crate::config::Config;
use crate::error::CalcError;
use crate::operation::{FunctionCall, Operation};
use crate::vars::Vars;

/// Calculates postfix operations on a value stack.
///
/// Every operand is evaluated before its function or operator runs. Lazy
/// callables still work but receive already computed values, so
/// `if(1, 2, x)` fails when `x` is undefined.
///
/// # Example
///
/// ```
/// use arith::{Calculate, Calculator, Config, Vars};
///
/// let calc = Calculator::parse("(a + b) / 2", &Config::default()).unwrap();
/// let vars = Vars::from_pairs([("a", 3.0), ("b", 5.0)]).unwrap();
/// assert_eq!(calc.calc(&vars), Ok(4.0));
/// ```
#[derive(Debug, Clone)]
pub struct Calculator {
    operations: Vec<Operation>,
    config: Config,
}

impl Calculate for Calculator {
    fn new(operations: Vec<Operation>, config: Config) -> Self {
        Self { operations, config }
    }

    fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn calc(&self, vars: &Vars) -> Result<f64, CalcError> {
        let mut stack: Vec<f64> = Vec::with_capacity(self.operations.len());

        for op in &self.operations {
            tracing::trace!(operation = %op, depth = stack.len(), "executing");
            let value = match op {
                Operation::Number { value } => *value,
                Operation::Variable(var) => vars
                    .get_normalized(&var.normalized_name)
                    .ok_or_else(|| CalcError::UndefinedVariable(var.name.clone()))?,
                Operation::FunctionCall(call) => self.call_function(call, &mut stack)?,
                Operation::BinaryOperator { symbol } => {
                    let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                        return Err(CalcError::NotEnoughBinaryArguments(symbol.clone()));
                    };
                    BinaryOp::resolve(symbol, &self.config)?.apply(a, b)?
                }
                Operation::UnaryOperator { symbol } => {
                    let Some(a) = stack.pop() else {
                        return Err(CalcError::NotEnoughUnaryArguments(symbol.clone()));
                    };
                    UnaryOp::resolve(symbol, &self.config)?.apply(a)?
                }
                Operation::Bracket | Operation::ParamSeparator => {
                    return Err(CalcError::InvalidOperation(op.kind_name().to_string()));
                }
            };
            stack.push(value);
        }

        match stack.as_slice() {
            [result] => {
                tracing::debug!(
                    operations = self.operations.len(),
                    result,
                    "calculated expression"
                );
                Ok(*result)
            }
            _ => Err(CalcError::InvalidSequence),
        }
    }
}

impl Calculator {
    fn call_function(&self, call: &FunctionCall, stack: &mut Vec<f64>) -> Result<f64, CalcError> {
        let arity = call
            .arity
            .ok_or_else(|| CalcError::InvalidFunctionArity(call.name.clone()))?;
        if stack.len() < arity {
            return Err(CalcError::NotEnoughFunctionArguments(call.name.clone()));
        }
        let args = stack.split_off(stack.len() - arity);

        let func = self
            .config
            .functions()
            .get(&call.normalized_name)
            .ok_or_else(|| CalcError::UndefinedFunction(call.name.clone()))?;
        func.call(&call.name, &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(ops: Vec<Operation>) -> Result<f64, CalcError> {
        Calculator::new(ops, Config::default()).calc(&Vars::new())
    }

    #[test]
    fn test_hand_built_sequence() {
        let ops = vec![
            Operation::number(2.0),
            Operation::number(3.0),
            Operation::binary("*"),
            Operation::unary("-"),
        ];
        assert_eq!(calc(ops), Ok(-6.0));
    }

    #[test]
    fn test_empty_sequence_is_invalid() {
        assert_eq!(calc(vec![]), Err(CalcError::InvalidSequence));
    }

    #[test]
    fn test_leftover_values_are_invalid() {
        let ops = vec![Operation::number(1.0), Operation::number(2.0)];
        assert_eq!(calc(ops), Err(CalcError::InvalidSequence));
    }

    #[test]
    fn test_parse_markers_are_rejected() {
        assert_eq!(
            calc(vec![Operation::Bracket]),
            Err(CalcError::InvalidOperation("bracket".to_string()))
        );
        assert_eq!(
            calc(vec![Operation::ParamSeparator]),
            Err(CalcError::InvalidOperation("param separator".to_string()))
        );
    }

    #[test]
    fn test_stack_underflow() {
        assert_eq!(
            calc(vec![Operation::number(1.0), Operation::binary("+")]),
            Err(CalcError::NotEnoughBinaryArguments("+".to_string()))
        );
        assert_eq!(
            calc(vec![Operation::unary("-")]),
            Err(CalcError::NotEnoughUnaryArguments("-".to_string()))
        );
        assert_eq!(
            calc(vec![Operation::function("abs", 1).unwrap()]),
            Err(CalcError::NotEnoughFunctionArguments("abs".to_string()))
        );
    }

    #[test]
    fn test_unresolved_arity() {
        let call = FunctionCall::new("abs", None).unwrap();
        assert_eq!(
            calc(vec![Operation::FunctionCall(call)]),
            Err(CalcError::InvalidFunctionArity("abs".to_string()))
        );
    }
}
