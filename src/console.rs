/// Console front-end
/// Line-based REPL over the command engine

use crate::models::CommandResult;
use crate::services::CommandEngine;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};

/// Prompt shown before each line: the current directory
fn prompt(engine: &CommandEngine) -> String {
    match engine.working_directory() {
        Ok(dir) => format!("{} $ ", dir.display()),
        Err(_) => "$ ".to_string(),
    }
}

/// Print a result the way the console shows it
pub fn render(result: &CommandResult, out: &mut impl Write) -> io::Result<()> {
    if !result.stdout.is_empty() {
        writeln!(out, "{}", result.stdout.trim_end_matches('\n'))?;
    }
    if !result.success && !result.stderr.is_empty() {
        writeln!(out, "ERROR: {}", result.stderr.trim_end_matches('\n'))?;
    }
    Ok(())
}

/// Read-eval-print loop. Returns when the user interrupts or closes input.
pub fn run_repl(engine: &CommandEngine, allow_shell: bool) -> rustyline::Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("cmdterm - type 'help' for commands. Ctrl-C to exit.");

    loop {
        match editor.readline(&prompt(engine)) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                // In-session recall only; the engine keeps the persisted history
                let _ = editor.add_history_entry(line.as_str());

                let result = engine.execute(&line, allow_shell);
                let stdout = io::stdout();
                if let Err(e) = render(&result, &mut stdout.lock()) {
                    log::warn!("Failed to write output: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("\nExiting.");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(())
}
