/// Engine configuration
/// Defaults live here; the binary overlays command-line flags and environment variables

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;
pub const DEFAULT_SHELL_TIMEOUT: Duration = Duration::from_secs(30);
pub const HISTORY_FILE_NAME: &str = ".cmdterm_history";

#[derive(Debug, Clone)]
pub struct Config {
    /// Where history is persisted; `None` keeps history in memory only
    pub history_path: Option<PathBuf>,
    pub history_capacity: usize,
    pub shell_timeout: Duration,
    /// Whether unknown commands may be run as external processes
    pub allow_shell: bool,
}

impl Config {
    /// Default history location in the user's home directory
    pub fn default_history_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(HISTORY_FILE_NAME))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_path: Self::default_history_path(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            shell_timeout: DEFAULT_SHELL_TIMEOUT,
            allow_shell: false,
        }
    }
}
