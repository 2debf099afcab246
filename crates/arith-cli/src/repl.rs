//! Interactive session

use anyhow::Result;
use arith::{Config, Vars};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::commands;

const HELP: &str = "\
  <expr>                evaluate an expression
  let <name> = <expr>   evaluate and bind to a variable
  :vars                 list variables
  :rpn <expr>           show the postfix form
  :lazy on|off          switch calculators
  :help                 show this help
  :quit                 exit";

/// What the loop should do after a line.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Print this and keep going
    Output(String),
    /// Nothing to print
    Silent,
    /// Leave the loop
    Quit,
}

/// REPL state that outlives a single line.
#[derive(Debug)]
pub struct Session {
    config: Config,
    vars: Vars,
    lazy: bool,
}

impl Session {
    pub fn new(lazy: bool) -> Self {
        Self {
            config: Config::default(),
            vars: Vars::new(),
            lazy,
        }
    }

    /// Handle one line of input. Errors are reported as output.
    pub fn handle(&mut self, line: &str) -> Outcome {
        match self.dispatch(line.trim()) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Output(format!("error: {e}")),
        }
    }

    fn dispatch(&mut self, line: &str) -> Result<Outcome> {
        if line.is_empty() {
            return Ok(Outcome::Silent);
        }

        if let Some(command) = line.strip_prefix(':') {
            let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
            return self.command(name, rest.trim());
        }

        if let Some(binding) = line.strip_prefix("let ") {
            let (name, expr) = binding
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected `let <name> = <expr>`"))?;
            let value = commands::evaluate(expr, &self.config, &self.vars, self.lazy)?;
            self.vars.set(name.trim(), value)?;
            return Ok(Outcome::Output(format!("{} = {value}", name.trim())));
        }

        let value = commands::evaluate(line, &self.config, &self.vars, self.lazy)?;
        Ok(Outcome::Output(value.to_string()))
    }

    fn command(&mut self, name: &str, arg: &str) -> Result<Outcome> {
        let outcome = match name {
            "q" | "quit" | "exit" => Outcome::Quit,
            "h" | "help" => Outcome::Output(HELP.to_string()),
            "vars" => {
                let lines: Vec<String> = self
                    .vars
                    .iter()
                    .map(|b| format!("{} = {}", b.name, b.value))
                    .collect();
                if lines.is_empty() {
                    Outcome::Output("(no variables)".to_string())
                } else {
                    Outcome::Output(lines.join("\n"))
                }
            }
            "rpn" => Outcome::Output(commands::rpn(arg, false)?),
            "lazy" => {
                match arg {
                    "on" => self.lazy = true,
                    "off" => self.lazy = false,
                    "" => {}
                    other => anyhow::bail!("expected `on` or `off`, got {other:?}"),
                }
                Outcome::Output(format!("lazy: {}", if self.lazy { "on" } else { "off" }))
            }
            other => anyhow::bail!("unknown command :{other}, try :help"),
        };
        Ok(outcome)
    }
}

/// Run the read-eval-print loop until `:quit`, Ctrl-D or Ctrl-C.
pub fn run(lazy: bool) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut session = Session::new(lazy);

    println!("arith {} (:help for commands)", arith::VERSION);

    loop {
        match editor.readline("arith> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.as_str())?;
                }
                match session.handle(&line) {
                    Outcome::Output(text) => println!("{text}"),
                    Outcome::Silent => {}
                    Outcome::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::debug!("repl finished");
    Ok(())
}
