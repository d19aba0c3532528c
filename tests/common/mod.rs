// Shared fakes for engine tests

#![allow(dead_code)]

use cmdterm_lib::error::{Result, TermError};
use cmdterm_lib::models::{ProcessSnapshot, SystemSummary};
use cmdterm_lib::services::{
    CommandEngine, HistoryLog, IntrospectionProvider, ProcessOutput, ProcessRunner,
    WorkingDirectory,
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Working directory kept in memory so tests do not race on the process cwd
pub struct VirtualDirectory {
    current: Mutex<PathBuf>,
    home: PathBuf,
}

impl VirtualDirectory {
    pub fn new(start: &Path) -> Self {
        let start = start.canonicalize().unwrap();
        Self {
            current: Mutex::new(start.clone()),
            home: start,
        }
    }
}

impl WorkingDirectory for VirtualDirectory {
    fn current(&self) -> Result<PathBuf> {
        Ok(self.current.lock().clone())
    }

    fn change(&self, path: &Path) -> Result<()> {
        let resolved = path
            .canonicalize()
            .map_err(TermError::io(format!("Cannot change directory to {}", path.display())))?;
        *self.current.lock() = resolved;
        Ok(())
    }

    fn home(&self) -> Option<PathBuf> {
        Some(self.home.clone())
    }
}

pub struct FixedIntrospection {
    pub summary: SystemSummary,
    pub processes: Vec<ProcessSnapshot>,
}

impl Default for FixedIntrospection {
    fn default() -> Self {
        let process = |pid, name: Option<&str>, cpu, mem| ProcessSnapshot {
            pid,
            name: name.map(str::to_string),
            cpu_percent: cpu,
            memory_percent: mem,
        };
        Self {
            summary: SystemSummary {
                cpu_percent: 12.5,
                per_core_cpu_percent: vec![10.0, 15.0],
                memory_total: 8 * 1024 * 1024 * 1024,
                memory_available: 6 * 1024 * 1024 * 1024,
                memory_used: 2 * 1024 * 1024 * 1024,
                memory_used_percent: 25.0,
                swap_total: 0,
                swap_used_percent: 0.0,
            },
            processes: vec![
                process(1, Some("init"), 0.1, 0.5),
                process(42, Some("compiler"), 88.0, 12.0),
                process(77, None, 3.0, 30.0),
                process(100, Some("editor"), 5.5, 8.0),
                process(101, Some("shell"), 1.0, 8.0),
            ],
        }
    }
}

impl IntrospectionProvider for FixedIntrospection {
    fn sample_system(&self) -> SystemSummary {
        self.summary.clone()
    }

    fn sample_processes(&self) -> Vec<ProcessSnapshot> {
        self.processes.clone()
    }
}

/// Runner that records calls and replies with a canned result
pub struct ScriptedRunner {
    pub calls: Arc<AtomicUsize>,
    pub reply: fn() -> Result<ProcessOutput>,
}

impl ScriptedRunner {
    pub fn replying(reply: fn() -> Result<ProcessOutput>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
                reply,
            },
            calls,
        )
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, _: &str, _: &[String], _: &Path, _: Duration) -> Result<ProcessOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

pub fn succeed() -> Result<ProcessOutput> {
    Ok(ProcessOutput {
        stdout: "external output\n".to_string(),
        stderr: String::new(),
        exit_code: 0,
    })
}

pub struct Harness {
    pub engine: CommandEngine,
    pub calls: Arc<AtomicUsize>,
}

pub fn engine_in(dir: &Path) -> Harness {
    engine_with(dir, HistoryLog::in_memory(1000), succeed)
}

pub fn engine_with(
    dir: &Path,
    history: HistoryLog,
    reply: fn() -> Result<ProcessOutput>,
) -> Harness {
    let (runner, calls) = ScriptedRunner::replying(reply);
    let engine = CommandEngine::from_parts(
        history,
        Arc::new(FixedIntrospection::default()),
        Arc::new(VirtualDirectory::new(dir)),
        Box::new(runner),
        Duration::from_secs(30),
    );
    Harness { engine, calls }
}
