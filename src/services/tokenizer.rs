/// Tokenizer
/// Splits a command line into words using POSIX shell quoting rules

use crate::error::Result;

/// Split `line` into tokens. Quotes group words; nothing is expanded.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    Ok(shell_words::split(line)?)
}
