/// Working Directory Service
/// Access to the process-wide current directory

use crate::error::{Result, TermError};
use std::path::{Path, PathBuf};

/// Reads and changes the current directory. The engine calls this instead of
/// touching `std::env` so the state can be replaced in tests.
pub trait WorkingDirectory: Send + Sync {
    fn current(&self) -> Result<PathBuf>;
    fn change(&self, path: &Path) -> Result<()>;

    /// Home directory used by a bare `cd`
    fn home(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// The real process directory
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessDirectory;

impl WorkingDirectory for ProcessDirectory {
    fn current(&self) -> Result<PathBuf> {
        std::env::current_dir().map_err(TermError::io("Cannot read current directory"))
    }

    fn change(&self, path: &Path) -> Result<()> {
        std::env::set_current_dir(path)
            .map_err(TermError::io(format!("Cannot change directory to {}", path.display())))
    }
}
