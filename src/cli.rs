/// Command-line arguments
/// Flags and environment variables layered over `Config` defaults

use crate::config::{Config, DEFAULT_HISTORY_CAPACITY};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "cmdterm", version, about = "Interactive command terminal")]
pub struct Args {
    /// Run a single command line and exit with its exit code
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub command: Option<String>,

    /// Print the result of --command as JSON
    #[arg(long, requires = "command")]
    pub json: bool,

    /// Refuse to run unknown commands as external programs
    #[arg(long)]
    pub no_shell: bool,

    /// History file location
    #[arg(long, env = "CMDTERM_HISTORY", value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Keep history in memory only
    #[arg(long, conflicts_with = "history_file")]
    pub no_history_file: bool,

    /// Maximum number of history entries kept
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history_size: usize,

    /// Seconds before an external command is stopped
    #[arg(long, env = "CMDTERM_SHELL_TIMEOUT", default_value_t = 30)]
    pub shell_timeout: u64,

    /// Log engine activity at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn to_config(&self) -> Config {
        let history_path = if self.no_history_file {
            None
        } else {
            self.history_file.clone().or_else(Config::default_history_path)
        };
        Config {
            history_path,
            history_capacity: self.history_size,
            shell_timeout: Duration::from_secs(self.shell_timeout),
            allow_shell: !self.no_shell,
        }
    }
}
