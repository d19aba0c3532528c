// Tests against the real process directory and real child processes

mod common;

use cmdterm_lib::services::{CommandEngine, HistoryLog, ProcessDirectory, SystemRunner};
use common::FixedIntrospection;
use serial_test::serial;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn host_engine(timeout: Duration) -> CommandEngine {
    CommandEngine::from_parts(
        HistoryLog::in_memory(100),
        Arc::new(FixedIntrospection::default()),
        Arc::new(ProcessDirectory),
        Box::new(SystemRunner),
        timeout,
    )
}

/// Puts the process back where it started when dropped
struct RestoreCwd(std::path::PathBuf);

impl Drop for RestoreCwd {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[test]
#[serial]
fn cd_changes_the_process_directory() {
    let _restore = RestoreCwd(std::env::current_dir().unwrap());
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("marker.txt"), "").unwrap();
    let engine = host_engine(Duration::from_secs(30));

    let cd = engine.execute(&format!("cd \"{}\"", dir.path().display()), false);
    assert!(cd.success, "{:?}", cd);

    let expected = dir.path().canonicalize().unwrap();
    assert_eq!(std::env::current_dir().unwrap().canonicalize().unwrap(), expected);
    assert_eq!(cd.working_directory.canonicalize().unwrap(), expected);

    // A fresh engine sees the same directory: the state is process-wide
    let other = host_engine(Duration::from_secs(30));
    assert_eq!(other.execute("ls", false).stdout, "marker.txt");
}

#[cfg(unix)]
#[test]
#[serial]
fn removed_working_directory_does_not_wedge_the_engine() {
    let _restore = RestoreCwd(std::env::current_dir().unwrap());
    let dir = tempdir().unwrap();
    let build = dir.path().join("build");
    fs::create_dir(&build).unwrap();
    let engine = host_engine(Duration::from_secs(30));

    let cd = engine.execute(&format!("cd \"{}\"", build.display()), false);
    assert!(cd.success, "{:?}", cd);
    fs::remove_dir_all(&build).unwrap();

    let help = engine.execute("help", false);
    assert!(help.success, "{:?}", help);
    assert!(help.stdout.contains("Builtins"));

    let back = engine.execute(&format!("cd \"{}\"", dir.path().display()), false);
    assert!(back.success, "{:?}", back);

    let expected = dir.path().canonicalize().unwrap();
    assert_eq!(std::env::current_dir().unwrap().canonicalize().unwrap(), expected);
    let pwd = engine.execute("pwd", false);
    assert_eq!(std::path::Path::new(&pwd.stdout).canonicalize().unwrap(), expected);
}

#[cfg(unix)]
#[test]
#[serial]
fn external_commands_run_in_the_working_directory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("data.txt"), "payload").unwrap();
    let engine = host_engine(Duration::from_secs(30));

    let result = engine.execute_in("cat data.txt", Some(dir.path()), true);
    assert_eq!(result.stdout, "payload");

    let external = engine.execute_in("wc -c data.txt", Some(dir.path()), true);
    assert!(external.success, "{:?}", external);
    assert!(external.stdout.trim_start().starts_with('7'));

    // Builtins never fall through to the host `ls`
    let failed = engine.execute_in("ls definitely-missing", Some(dir.path()), true);
    assert!(!failed.success);
    assert!(failed.stderr.starts_with("No such file or directory"));

    let external_failure = engine.execute_in("sh -c 'exit 5'", Some(dir.path()), true);
    assert!(!external_failure.success);
    assert_eq!(external_failure.exit_code, 5);
    assert!(!external_failure.stderr.is_empty());
}

#[cfg(unix)]
#[test]
#[serial]
fn long_running_command_is_stopped_at_the_timeout() {
    let engine = host_engine(Duration::from_millis(300));
    let started = std::time::Instant::now();

    let result = engine.execute("sleep 10", true);
    assert!(!result.success);
    assert_eq!(result.exit_code, 124);
    assert_eq!(result.stderr, "Command timed out");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
#[serial]
fn missing_program_reports_not_found() {
    let engine = host_engine(Duration::from_secs(5));
    let result = engine.execute("cmdterm-no-such-program-xyz", true);
    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.starts_with("Command not found"));
}
