//! Command-line argument definitions

use clap::{Parser, Subcommand};

/// Evaluate, inspect and validate arithmetic expressions.
#[derive(Debug, Parser)]
#[command(name = "arith")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Evaluate, inspect and validate arithmetic expressions")]
pub struct Cli {
    /// Log parser and calculator activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate an expression and print the result
    Eval {
        /// The expression, e.g. "round(pi() * r * r, 2)"
        expr: String,

        /// Variable binding, repeatable
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,

        /// Use the lazy calculator
        #[arg(long)]
        lazy: bool,
    },

    /// Print the expression in postfix (RPN) order
    Rpn {
        /// The expression
        expr: String,

        /// Print the parsed operations, variables and functions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report missing variables, functions and arguments
    Check {
        /// The expression
        expr: String,

        /// Name of a variable that will be provided, repeatable
        #[arg(long = "var", value_name = "NAME")]
        vars: Vec<String>,
    },

    /// Start an interactive session
    Repl {
        /// Start with the lazy calculator
        #[arg(long)]
        lazy: bool,
    },
}

/// Parse `NAME=VALUE`.
pub fn parse_binding(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for {}: {e}", name.trim()))?;
    Ok((name.trim().to_string(), value))
}
