/// cmdterm
/// Command terminal with a builtin engine shared by a console REPL and UI front-ends
///
/// Module structure:
/// - commands: front-end boundary (UI → engine)
/// - services: command engine, builtins, history, process and system access
/// - models: shared data types
/// - console: line-based REPL

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod services;

use clap::Parser;
use cli::Args;
use services::CommandEngine;
use std::process::ExitCode;

pub use config::Config;
pub use error::TermError;
pub use models::CommandResult;

pub fn run() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = args.to_config();
    let engine = CommandEngine::new(&config);

    if let Some(line) = &args.command {
        let result = engine.execute(line, config.allow_shell);
        if args.json {
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    log::error!("Failed to encode result: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        } else if let Err(e) = console::render(&result, &mut std::io::stdout().lock()) {
            log::error!("Failed to write output: {}", e);
        }
        return ExitCode::from(u8::try_from(result.exit_code).unwrap_or(1));
    }

    match console::run_repl(&engine, config.allow_shell) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Console stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
