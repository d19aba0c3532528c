/// Models module
/// Shared data types between the engine and its front-ends
/// All types here are serializable so a UI can receive them as JSON

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Command execution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub working_directory: PathBuf,
    pub exit_code: i32,
}

impl CommandResult {
    /// Successful result with the given output
    pub fn ok(stdout: impl Into<String>, working_directory: PathBuf) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
            working_directory,
            exit_code: 0,
        }
    }

    /// Failed result; an empty message is replaced so stderr is never blank on failure
    pub fn failed(stderr: impl Into<String>, exit_code: i32, working_directory: PathBuf) -> Self {
        let mut stderr = stderr.into();
        if stderr.trim().is_empty() {
            stderr = format!("Command exited with status {}", exit_code);
        }
        Self {
            success: false,
            stdout: String::new(),
            stderr,
            working_directory,
            exit_code: if exit_code == 0 { 1 } else { exit_code },
        }
    }
}

/// One row of the process table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: Option<String>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

impl ProcessSnapshot {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// Point-in-time CPU and memory utilization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub cpu_percent: f64,
    pub per_core_cpu_percent: Vec<f64>,
    pub memory_total: u64,
    pub memory_available: u64,
    pub memory_used: u64,
    pub memory_used_percent: f64,
    pub swap_total: u64,
    pub swap_used_percent: f64,
}

/// Ordering used for process listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Cpu,
    Mem,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cpu" => Some(SortKey::Cpu),
            "mem" | "memory" => Some(SortKey::Mem),
            _ => None,
        }
    }

    /// Value of this key for a process
    pub fn value(self, process: &ProcessSnapshot) -> f64 {
        match self {
            SortKey::Cpu => process.cpu_percent,
            SortKey::Mem => process.memory_percent,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Cpu => f.write_str("cpu"),
            SortKey::Mem => f.write_str("mem"),
        }
    }
}

/// Directory entry shown by the file browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// File browser preview; `content` is empty when the file is too large
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePreview {
    pub path: PathBuf,
    pub content: Option<String>,
    pub too_large: bool,
}
