/// Command Engine
/// Tokenizes a command line, dispatches it and folds every outcome into a CommandResult

use crate::config::Config;
use crate::error::Result;
use crate::models::CommandResult;
use crate::services::builtins::{Dispatch, DispatchContext, Outcome};
use crate::services::history::HistoryLog;
use crate::services::introspection::{IntrospectionProvider, SysinfoProvider};
use crate::services::shell::{ProcessRunner, ShellFallback, SystemRunner};
use crate::services::tokenizer::tokenize;
use crate::services::workdir::{ProcessDirectory, WorkingDirectory};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Shared execution engine for every front-end
///
/// The history lock is held for the whole of `execute`, so calls from several
/// front-ends run one at a time and never interleave directory changes.
pub struct CommandEngine {
    history: Mutex<HistoryLog>,
    last_directory: Mutex<Option<PathBuf>>,
    introspection: Arc<dyn IntrospectionProvider>,
    workdir: Arc<dyn WorkingDirectory>,
    shell: ShellFallback,
}

impl CommandEngine {
    /// Engine wired to the host OS, with history loaded from the configured file
    pub fn new(config: &Config) -> Self {
        let history = match &config.history_path {
            Some(path) => HistoryLog::load(path, config.history_capacity),
            None => HistoryLog::in_memory(config.history_capacity),
        };
        Self::from_parts(
            history,
            Arc::new(SysinfoProvider::new()),
            Arc::new(ProcessDirectory),
            Box::new(SystemRunner),
            config.shell_timeout,
        )
    }

    pub fn from_parts(
        history: HistoryLog,
        introspection: Arc<dyn IntrospectionProvider>,
        workdir: Arc<dyn WorkingDirectory>,
        runner: Box<dyn ProcessRunner>,
        shell_timeout: Duration,
    ) -> Self {
        Self {
            history: Mutex::new(history),
            last_directory: Mutex::new(None),
            introspection,
            workdir,
            shell: ShellFallback::new(runner, shell_timeout),
        }
    }

    /// Run one command line against the process working directory
    pub fn execute(&self, line: &str, allow_shell: bool) -> CommandResult {
        self.execute_in(line, None, allow_shell)
    }

    /// Run one command line. `cwd` overrides the base directory for relative
    /// paths; `cd` still changes the process directory.
    pub fn execute_in(&self, line: &str, cwd: Option<&Path>, allow_shell: bool) -> CommandResult {
        let mut history = self.history.lock();
        history.append(line);

        let base = match cwd {
            Some(dir) => dir.to_path_buf(),
            None => self.base_directory(),
        };

        let result = match self.dispatch(line, &base, &history, allow_shell) {
            Ok(result) => result,
            Err(e) => {
                log::info!("Command {:?} failed: {}", line, e);
                CommandResult::failed(e.to_string(), e.exit_code(), base)
            }
        };
        if cwd.is_none() {
            *self.last_directory.lock() = Some(result.working_directory.clone());
        }

        log::debug!(
            "Executed {:?}: exit code {} in {}",
            line,
            result.exit_code,
            result.working_directory.display()
        );
        result
    }

    /// Most recent history entries, newest first
    pub fn recent_history(&self, n: usize) -> Vec<String> {
        self.history.lock().recent(n)
    }

    pub fn introspection(&self) -> &dyn IntrospectionProvider {
        self.introspection.as_ref()
    }

    /// Current process working directory, read fresh
    pub fn working_directory(&self) -> Result<PathBuf> {
        self.workdir.current()
    }

    /// Process directory, or the best stand-in when it cannot be read (it was
    /// removed underneath us): last directory seen, then home, then `/`.
    /// Commands that do not touch the directory, and `cd` to an absolute path,
    /// keep working until the user moves somewhere valid.
    fn base_directory(&self) -> PathBuf {
        let err = match self.workdir.current() {
            Ok(dir) => {
                *self.last_directory.lock() = Some(dir.clone());
                return dir;
            }
            Err(e) => e,
        };
        let fallback = self
            .last_directory
            .lock()
            .clone()
            .or_else(|| self.workdir.home())
            .unwrap_or_else(|| PathBuf::from("/"));
        log::warn!(
            "Cannot determine working directory ({}); using {}",
            err,
            fallback.display()
        );
        fallback
    }

    fn dispatch(
        &self,
        line: &str,
        base: &Path,
        history: &HistoryLog,
        allow_shell: bool,
    ) -> Result<CommandResult> {
        let tokens = tokenize(line)?;
        let Some(name) = tokens.first() else {
            return Ok(CommandResult::ok(String::new(), base.to_path_buf()));
        };

        match Dispatch::resolve(name) {
            Dispatch::Builtin(builtin) => {
                let mut ctx = DispatchContext {
                    cwd: base.to_path_buf(),
                    history,
                    introspection: self.introspection.as_ref(),
                    workdir: self.workdir.as_ref(),
                };
                let Outcome {
                    stdout,
                    changed_directory,
                } = builtin.run(&tokens[1..], &mut ctx)?;
                Ok(CommandResult::ok(stdout, changed_directory.unwrap_or(ctx.cwd)))
            }
            Dispatch::External => {
                let output = self.shell.run(&tokens, base, allow_shell)?;
                let result = if output.exit_code == 0 {
                    CommandResult {
                        stderr: output.stderr,
                        ..CommandResult::ok(output.stdout, base.to_path_buf())
                    }
                } else {
                    CommandResult {
                        stdout: output.stdout,
                        ..CommandResult::failed(output.stderr, output.exit_code, base.to_path_buf())
                    }
                };
                Ok(result)
            }
        }
    }
}
