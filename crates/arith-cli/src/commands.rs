//! One-shot subcommands

use std::process::ExitCode;

use anyhow::{Context, Result};
use arith::{Calculate, Calculator, Config, LazyCalculator, Parser, Validator, Vars};

/// Evaluate `expr` with the given bindings.
pub fn eval(expr: &str, bindings: &[(String, f64)], lazy: bool) -> Result<f64> {
    let vars = Vars::from_pairs(bindings.iter().map(|(name, value)| (name.as_str(), *value)))
        .context("invalid --var")?;
    evaluate(expr, &Config::default(), &vars, lazy)
}

/// Evaluate with whichever calculator is selected.
pub fn evaluate(expr: &str, config: &Config, vars: &Vars, lazy: bool) -> Result<f64> {
    let value = if lazy {
        LazyCalculator::evaluate(expr, config, vars)?
    } else {
        Calculator::evaluate(expr, config, vars)?
    };
    Ok(value)
}

/// Render the postfix form of `expr`, or its JSON form.
pub fn rpn(expr: &str, json: bool) -> Result<String> {
    let parsed = Parser::default().parse(expr)?;
    if json {
        serde_json::to_string_pretty(&parsed).context("failed to serialize operations")
    } else {
        Ok(parsed.to_string())
    }
}

/// Print every validator warning. Fails the process if there are any.
pub fn check(expr: &str, vars: &[String]) -> Result<ExitCode> {
    let parsed = Parser::default().parse(expr)?;
    let (valid, warnings) = Validator::is_valid_with_warnings(&parsed, &Config::default(), vars);
    for warning in &warnings {
        println!("{warning}");
    }
    if valid {
        println!("ok");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
