/// Shell Fallback Service
/// Runs unknown commands as external processes when the caller allows it

use crate::error::{Result, TermError};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

pub const SHELL_DISABLED_MESSAGE: &str =
    "Unknown command and shell execution is disabled for safety";

/// Captured output of an external process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Spawns external programs. Returns `TermError::Timeout` when the limit is hit.
pub trait ProcessRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<ProcessOutput>;
}

/// Runner backed by `std::process::Command`
///
/// The program is executed directly, not through `sh -c`, so the tokens the
/// engine parsed are exactly the argv the child sees.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<ProcessOutput> {
        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    TermError::NotFound(format!("Command not found: {}", program))
                }
                _ => TermError::io(format!("Failed to execute {}", program))(e),
            })?;

        // Drain pipes on their own threads so a chatty child cannot block on a full pipe
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = match child.wait_timeout(timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill(&mut child, program);
                return Err(TermError::Timeout);
            }
            Err(e) => {
                kill(&mut child, program);
                return Err(TermError::io(format!("Failed to wait for {}", program))(e));
            }
        };

        Ok(ProcessOutput {
            stdout: join_reader(stdout_reader),
            stderr: join_reader(stderr_reader),
            exit_code: exit_code(status),
        })
    }
}

/// Single choke point for the `allow_shell` policy
pub struct ShellFallback {
    runner: Box<dyn ProcessRunner>,
    timeout: Duration,
}

impl ShellFallback {
    pub fn new(runner: Box<dyn ProcessRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    pub fn run(&self, tokens: &[String], cwd: &Path, allow_shell: bool) -> Result<ProcessOutput> {
        if !allow_shell {
            return Err(TermError::PermissionDenied(SHELL_DISABLED_MESSAGE.to_string()));
        }
        let Some((program, args)) = tokens.split_first() else {
            return Err(TermError::InvalidArgument("No command given".to_string()));
        };

        log::debug!("Running external command {:?} in {}", tokens, cwd.display());
        self.runner.run(program, args, cwd, self.timeout)
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<thread::JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_reader(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn kill(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        log::warn!("Failed to kill {}: {}", program, e);
    }
    let _ = child.wait();
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingRunner(Arc<AtomicUsize>);

    impl ProcessRunner for CountingRunner {
        fn run(&self, _: &str, _: &[String], _: &Path, _: Duration) -> Result<ProcessOutput> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(ProcessOutput {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
            })
        }
    }

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn disabled_fallback_never_spawns() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fallback = ShellFallback::new(
            Box::new(CountingRunner(calls.clone())),
            Duration::from_secs(1),
        );

        let err = fallback
            .run(&tokens(&["frobnicate"]), Path::new("."), false)
            .unwrap_err();
        assert!(matches!(err, TermError::PermissionDenied(_)));
        assert_eq!(err.to_string(), SHELL_DISABLED_MESSAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        fallback.run(&tokens(&["frobnicate"]), Path::new("."), true).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[cfg(unix)]
    #[test]
    fn captures_output_and_exit_code() {
        let out = SystemRunner
            .run(
                "sh",
                &tokens(&["-c", "echo out; echo err >&2; exit 3"]),
                Path::new("."),
                Duration::from_secs(10),
            )
            .unwrap();
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
        assert_eq!(out.exit_code, 3);
    }

    #[cfg(unix)]
    #[test]
    fn slow_command_times_out() {
        let err = SystemRunner
            .run("sleep", &tokens(&["5"]), Path::new("."), Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, TermError::Timeout));
    }

    #[test]
    fn missing_program_is_not_found() {
        let err = SystemRunner
            .run(
                "definitely-not-a-real-program-cmdterm",
                &[],
                Path::new("."),
                Duration::from_secs(1),
            )
            .unwrap_err();
        assert!(matches!(err, TermError::NotFound(_)));
    }
}
