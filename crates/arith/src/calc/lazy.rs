//! Lazy tree-building calculator
//!
//! The postfix sequence is folded into an expression tree first. Operator
//! symbols and function arities are checked while building; variables and
//! functions are only looked up when their node is evaluated. Lazy
//! callables receive the subtrees themselves and may skip them.

use super::ops::{BinaryOp, UnaryOp};
use super::Calculate;
use crate::argument::LazyArgument;
use crate::config::{Config, Func};
use crate::error::CalcError;
use crate::operation::{FunctionCall, Operation};
use crate::vars::Vars;

/// Default limit on the expression tree depth.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Calculates expressions by evaluating a tree on demand.
///
/// # Example
///
/// ```
/// use arith::{Calculate, Config, LazyCalculator, Vars};
///
/// let calc = LazyCalculator::parse("if(x > 0, x, undefined_var)", &Config::default()).unwrap();
/// let vars = Vars::from_pairs([("x", 2.0)]).unwrap();
/// assert_eq!(calc.calc(&vars), Ok(2.0));
/// ```
#[derive(Debug, Clone)]
pub struct LazyCalculator {
    operations: Vec<Operation>,
    config: Config,
    max_depth: usize,
}

impl LazyCalculator {
    /// Limit the depth of the expression tree.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The tree depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn build<'a>(&'a self, vars: &Vars) -> Result<Node<'a>, CalcError> {
        let mut stack: Vec<(Node<'a>, usize)> = Vec::with_capacity(self.operations.len());

        for op in &self.operations {
            tracing::trace!(operation = %op, depth = stack.len(), "building node");
            let entry = match op {
                Operation::Number { value } => (Node::Value(*value), 1),
                Operation::Variable(var) => (
                    Node::Variable {
                        name: &var.name,
                        value: vars.get_normalized(&var.normalized_name),
                    },
                    1,
                ),
                Operation::FunctionCall(call) => self.function_node(call, &mut stack)?,
                Operation::BinaryOperator { symbol } => {
                    let (Some((right, rd)), Some((left, ld))) = (stack.pop(), stack.pop()) else {
                        return Err(CalcError::NotEnoughBinaryArguments(symbol.clone()));
                    };
                    let node = Node::Binary {
                        op: BinaryOp::resolve(symbol, &self.config)?,
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                    (node, ld.max(rd) + 1)
                }
                Operation::UnaryOperator { symbol } => {
                    let Some((arg, depth)) = stack.pop() else {
                        return Err(CalcError::NotEnoughUnaryArguments(symbol.clone()));
                    };
                    match UnaryOp::resolve(symbol, &self.config)? {
                        UnaryOp::Plus => (arg, depth),
                        op => (
                            Node::Unary {
                                op,
                                arg: Box::new(arg),
                            },
                            depth + 1,
                        ),
                    }
                }
                Operation::Bracket | Operation::ParamSeparator => {
                    return Err(CalcError::InvalidOperation(op.kind_name().to_string()));
                }
            };

            if entry.1 > self.max_depth {
                return Err(CalcError::TooDeep {
                    depth: entry.1,
                    max: self.max_depth,
                });
            }
            stack.push(entry);
        }

        match (stack.pop(), stack.is_empty()) {
            (Some((root, _)), true) => Ok(root),
            _ => Err(CalcError::InvalidSequence),
        }
    }

    fn function_node<'a>(
        &'a self,
        call: &'a FunctionCall,
        stack: &mut Vec<(Node<'a>, usize)>,
    ) -> Result<(Node<'a>, usize), CalcError> {
        let arity = call
            .arity
            .ok_or_else(|| CalcError::InvalidFunctionArity(call.name.clone()))?;
        if stack.len() < arity {
            return Err(CalcError::NotEnoughFunctionArguments(call.name.clone()));
        }

        let mut depth = 0;
        let args: Vec<Node<'a>> = stack
            .split_off(stack.len() - arity)
            .into_iter()
            .map(|(node, d)| {
                depth = depth.max(d);
                node
            })
            .collect();

        let node = Node::Function {
            call,
            func: self.config.functions().get(&call.normalized_name),
            args,
        };
        Ok((node, depth + 1))
    }
}

impl Calculate for LazyCalculator {
    fn new(operations: Vec<Operation>, config: Config) -> Self {
        Self {
            operations,
            config,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn calc(&self, vars: &Vars) -> Result<f64, CalcError> {
        let root = self.build(vars)?;
        let result = root.value()?;
        tracing::debug!(
            operations = self.operations.len(),
            result,
            "calculated expression lazily"
        );
        Ok(result)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Expression Tree
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug)]
enum Node<'a> {
    Value(f64),
    Variable {
        name: &'a str,
        value: Option<f64>,
    },
    Function {
        call: &'a FunctionCall,
        func: Option<&'a Func>,
        args: Vec<Node<'a>>,
    },
    Binary {
        op: BinaryOp<'a>,
        left: Box<Node<'a>>,
        right: Box<Node<'a>>,
    },
    Unary {
        op: UnaryOp<'a>,
        arg: Box<Node<'a>>,
    },
}

impl LazyArgument for Node<'_> {
    fn value(&self) -> Result<f64, CalcError> {
        match self {
            Node::Value(v) => Ok(*v),
            Node::Variable { name, value } => {
                value.ok_or_else(|| CalcError::UndefinedVariable(name.to_string()))
            }
            Node::Function { call, func, args } => {
                let func = func.ok_or_else(|| CalcError::UndefinedFunction(call.name.clone()))?;
                let args: Vec<&dyn LazyArgument> =
                    args.iter().map(|a| a as &dyn LazyArgument).collect();
                func.call_lazy(&call.name, &args)
            }
            Node::Binary { op, left, right } => op.apply_lazy(left.as_ref(), right.as_ref()),
            Node::Unary { op, arg } => op.apply_lazy(arg.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lazy(input: &str) -> LazyCalculator {
        LazyCalculator::parse(input, &Config::default()).unwrap()
    }

    #[test]
    fn test_default_max_depth() {
        assert_eq!(lazy("1").max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(lazy("1").with_max_depth(3).max_depth(), 3);
    }

    #[test]
    fn test_depth_limit() {
        let calc = lazy("1 + 2 + 3 + 4").with_max_depth(3);
        assert_eq!(
            calc.calc(&Vars::new()),
            Err(CalcError::TooDeep { depth: 4, max: 3 })
        );
        assert_eq!(lazy("1 + 2 + 3 + 4").calc(&Vars::new()), Ok(10.0));
    }

    #[test]
    fn test_unary_plus_adds_no_depth() {
        let calc = lazy("+ + + 1").with_max_depth(1);
        assert_eq!(calc.calc(&Vars::new()), Ok(1.0));
    }

    #[test]
    fn test_operator_errors_surface_at_build_time() {
        let ops = vec![
            Operation::number(1.0),
            Operation::number(2.0),
            Operation::binary("%"),
        ];
        let calc = LazyCalculator::new(ops, Config::default());
        assert_eq!(
            calc.calc(&Vars::new()),
            Err(CalcError::UndefinedBinaryOperator("%".to_string()))
        );
    }

    #[test]
    fn test_lookups_deferred_until_evaluated() {
        assert_eq!(lazy("1 or undefined_fn(x)").calc(&Vars::new()), Ok(1.0));
        assert_eq!(
            lazy("0 or undefined_fn(1)").calc(&Vars::new()),
            Err(CalcError::UndefinedFunction("undefined_fn".to_string()))
        );
    }
}
