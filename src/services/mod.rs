/// Services module
/// Command engine and the collaborators it dispatches to
/// Front-end concerns stay in `commands` and `console`

pub mod builtins;
pub mod engine;
pub mod history;
pub mod introspection;
pub mod shell;
pub mod tokenizer;
pub mod workdir;

pub use engine::CommandEngine;
pub use history::HistoryLog;
pub use introspection::{IntrospectionProvider, SysinfoProvider};
pub use shell::{ProcessOutput, ProcessRunner, ShellFallback, SystemRunner};
pub use workdir::{ProcessDirectory, WorkingDirectory};
