/// Builtin commands
/// Name → handler table for every command implemented natively by the engine

mod fs;
mod monitor;

use crate::error::Result;
use crate::services::history::HistoryLog;
use crate::services::introspection::IntrospectionProvider;
use crate::services::workdir::WorkingDirectory;
use std::path::{Path, PathBuf};

pub use fs::sorted_entries;
pub use monitor::top_processes;

/// Entries shown by the `history` builtin
pub const HISTORY_DISPLAY_LIMIT: usize = 200;

pub const HELP_TEXT: &str = "\
Builtins: pwd cwd ls cd mkdir rm del touch cat mv cp head tail history help ps cpu mem
  ls [path] [-l|--long]      list a directory
  cd [path]                  change directory (default: home)
  mkdir <name>               create a directory and its parents
  rm <target> [-r|-rf]       remove a file, or a directory with -r
  touch <name>               create an empty file
  cat <file>                 print a file
  mv <src> <dst>             move or rename
  cp <src> <dst>             copy a file
  head|tail [-n N] <file>    first or last N lines (default 10)
  history                    recent commands, newest first
  ps [--sort=cpu|mem] [N]    top N processes (default 10)
  cpu | mem                  CPU and memory usage
Unknown commands run as external programs only when shell execution is enabled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Pwd,
    Ls,
    Cd,
    Mkdir,
    Rm,
    Touch,
    Cat,
    Mv,
    Cp,
    Head,
    Tail,
    History,
    Help,
    Ps,
    Cpu,
    Mem,
}

/// Command names, aliases included
const TABLE: &[(&str, Builtin)] = &[
    ("pwd", Builtin::Pwd),
    ("cwd", Builtin::Pwd),
    ("ls", Builtin::Ls),
    ("cd", Builtin::Cd),
    ("mkdir", Builtin::Mkdir),
    ("rm", Builtin::Rm),
    ("del", Builtin::Rm),
    ("touch", Builtin::Touch),
    ("cat", Builtin::Cat),
    ("mv", Builtin::Mv),
    ("cp", Builtin::Cp),
    ("head", Builtin::Head),
    ("tail", Builtin::Tail),
    ("history", Builtin::History),
    ("help", Builtin::Help),
    ("ps", Builtin::Ps),
    ("cpu", Builtin::Cpu),
    ("mem", Builtin::Mem),
];

/// Where a command line goes after tokenizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Builtin(Builtin),
    External,
}

impl Dispatch {
    pub fn resolve(name: &str) -> Self {
        Builtin::lookup(name).map_or(Dispatch::External, Dispatch::Builtin)
    }
}

/// What a handler sees while running
pub struct DispatchContext<'a> {
    pub cwd: PathBuf,
    pub history: &'a HistoryLog,
    pub introspection: &'a dyn IntrospectionProvider,
    pub workdir: &'a dyn WorkingDirectory,
}

impl DispatchContext<'_> {
    /// Resolve a user-supplied path against the working directory
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Handler output; `changed_directory` is set by `cd`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outcome {
    pub stdout: String,
    pub changed_directory: Option<PathBuf>,
}

impl Outcome {
    pub fn text(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            changed_directory: None,
        }
    }
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        TABLE
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, builtin)| *builtin)
    }

    /// All names the table recognizes
    pub fn names() -> impl Iterator<Item = &'static str> {
        TABLE.iter().map(|(name, _)| *name)
    }

    pub fn run(self, args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
        match self {
            Builtin::Pwd => Ok(Outcome::text(ctx.cwd.display().to_string())),
            Builtin::Ls => fs::ls(args, ctx),
            Builtin::Cd => fs::cd(args, ctx),
            Builtin::Mkdir => fs::mkdir(args, ctx),
            Builtin::Rm => fs::rm(args, ctx),
            Builtin::Touch => fs::touch(args, ctx),
            Builtin::Cat => fs::cat(args, ctx),
            Builtin::Mv => fs::mv(args, ctx),
            Builtin::Cp => fs::cp(args, ctx),
            Builtin::Head => fs::head(args, ctx),
            Builtin::Tail => fs::tail(args, ctx),
            Builtin::History => Ok(Outcome::text(
                ctx.history.recent(HISTORY_DISPLAY_LIMIT).join("\n"),
            )),
            Builtin::Help => Ok(Outcome::text(HELP_TEXT)),
            Builtin::Ps => monitor::ps(args, ctx),
            Builtin::Cpu => Ok(monitor::cpu(ctx)),
            Builtin::Mem => Ok(monitor::mem(ctx)),
        }
    }
}

/// Arguments that are not flags
fn positional(args: &[String]) -> impl Iterator<Item = &String> {
    args.iter().filter(|arg| !arg.starts_with('-') || arg.as_str() == "-")
}

fn has_flag(args: &[String], flags: &[&str]) -> bool {
    args.iter().any(|arg| flags.contains(&arg.as_str()))
}
