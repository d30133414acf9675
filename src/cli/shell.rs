use std::io::{self, BufRead};

use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};
use thiserror::Error;

use crate::cli::commands::{LoopControl, ShellContext};
use crate::cli::output;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CliMode {
    Interactive,
    Script,
}

/// Runs the banking shell until `exit` or end of input.
///
/// Setting `BANK_CORE_CLI_SCRIPT` switches to a plain stdin line loop so the
/// shell can be driven from tests and pipes.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os("BANK_CORE_CLI_SCRIPT").is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new();
    output::info("Bank Account Manager. Type `help` for commands.");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<(), DefaultHistory>::new()?;

    loop {
        match editor.readline("bank> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if handle_line(context, trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if handle_line(context, &line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> LoopControl {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse command: {err}"));
            return LoopControl::Continue;
        }
    };

    if tokens.is_empty() {
        return LoopControl::Continue;
    }

    let command = tokens[0].to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
    context.dispatch(&command, &args)
}
