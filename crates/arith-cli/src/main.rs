//! arith: command-line calculator
//!
//! Evaluates, prints in postfix order and validates arithmetic expressions,
//! or runs an interactive session. Set `RUST_LOG` or pass `--verbose` to see
//! what the parser and calculators are doing.

mod cli;
mod commands;
mod repl;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), cli.verbose)?)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Eval { expr, vars, lazy } => {
            let value = commands::eval(&expr, &vars, lazy)?;
            println!("{value}");
        }
        Command::Rpn { expr, json } => println!("{}", commands::rpn(&expr, json)?),
        Command::Check { expr, vars } => return commands::check(&expr, &vars),
        Command::Repl { lazy } => repl::run(lazy)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// `RUST_LOG` when set, `arith=warn` otherwise. `--verbose` raises `arith`
/// to `debug` on top of either.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> anyhow::Result<EnvFilter> {
    let filter = match rust_log {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {}: {directives}", EnvFilter::DEFAULT_ENV))?,
        None => EnvFilter::new("arith=warn"),
    };
    if verbose {
        Ok(filter.add_directive("arith=debug".parse()?))
    } else {
        Ok(filter)
    }
}
