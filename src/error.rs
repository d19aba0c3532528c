/// Error types
/// Every failure a command can hit; the engine turns these into failed results

use std::io;
use thiserror::Error;

/// Exit code reported when an external command hits its timeout
pub const TIMEOUT_EXIT_CODE: i32 = 124;

#[derive(Debug, Error)]
pub enum TermError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    IsADirectory(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Command timed out")]
    Timeout,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl TermError {
    /// Wrap an I/O error with a short description of what was attempted
    pub fn io(context: impl Into<String>) -> impl FnOnce(io::Error) -> TermError {
        let context = context.into();
        move |source| TermError::Io { context, source }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            TermError::Timeout => TIMEOUT_EXIT_CODE,
            _ => 1,
        }
    }
}

impl From<shell_words::ParseError> for TermError {
    fn from(err: shell_words::ParseError) -> Self {
        TermError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TermError>;
