/// History Service
/// Bounded, ordered log of executed command lines, persisted one per line

use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub struct HistoryLog {
    entries: VecDeque<String>,
    capacity: usize,
    path: Option<PathBuf>,
}

impl HistoryLog {
    /// Log without a backing file
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            path: None,
        }
    }

    /// Load persisted history. A missing or unreadable file gives an empty log.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let mut history = Self::in_memory(capacity);

        match fs::read(&path) {
            Ok(bytes) => {
                // Lines that are not valid UTF-8 or are blank are dropped
                for line in bytes.split(|b| *b == b'\n') {
                    let Ok(line) = std::str::from_utf8(line) else {
                        continue;
                    };
                    let line = line.strip_suffix('\r').unwrap_or(line);
                    if !line.trim().is_empty() {
                        history.push(line.to_string());
                    }
                }
                log::debug!("Loaded {} history entries from {}", history.len(), path.display());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not read history file {}: {}", path.display(), e),
        }

        history.path = Some(path);
        history
    }

    /// Record a command and flush the log. Blank commands are ignored.
    pub fn append(&mut self, command: &str) {
        if command.trim().is_empty() {
            return;
        }
        self.push(command.to_string());

        if let Err(e) = self.persist() {
            if let Some(path) = &self.path {
                log::warn!("Failed to save history to {}: {}", path.display(), e);
            }
        }
    }

    /// Last `n` entries, most recent first
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    /// Write the whole log to its backing file
    pub fn persist(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut buf = String::with_capacity(self.entries.iter().map(|e| e.len() + 1).sum());
        for entry in &self.entries {
            buf.push_str(entry);
            buf.push('\n');
        }
        let mut file = fs::File::create(path)?;
        file.write_all(buf.as_bytes())?;
        file.flush()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: String) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }
}
