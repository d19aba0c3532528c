/// Shell command
/// Runs a command line through the engine and returns the structured result
/// Called from the front-end terminal box when the user presses run

use crate::models::CommandResult;
use crate::services::CommandEngine;
use std::path::Path;

/// Execute a command line and return its result
///
/// # Arguments
/// * `engine` - The shared command engine
/// * `command` - The raw command line
/// * `cwd` - Optional working directory for relative paths
/// * `allow_shell` - Whether unknown commands may run as external programs
///
/// # Returns
/// The command result; failures are reported inside it, never as an error
pub fn execute_command(
    engine: &CommandEngine,
    command: &str,
    cwd: Option<String>,
    allow_shell: bool,
) -> CommandResult {
    engine.execute_in(command, cwd.as_deref().map(Path::new), allow_shell)
}
