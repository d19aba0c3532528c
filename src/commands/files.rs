/// File browser commands
/// Directory listing and file preview for the front-end file tree
/// These read the filesystem directly and do not go through the engine or its history

use crate::models::{FileEntry, FilePreview};
use crate::services::builtins::sorted_entries;
use std::fs;
use std::path::Path;

/// Files at or above this size are not previewed
pub const PREVIEW_LIMIT: u64 = 200_000;

/// List a directory, directories first
pub fn list_directory(path: &str) -> Result<Vec<FileEntry>, String> {
    sorted_entries(Path::new(path)).map_err(|e| format!("Failed to list {}: {}", path, e))
}

/// Read a file for preview; large files are reported instead of read
pub fn preview_file(path: &str) -> Result<FilePreview, String> {
    let meta = fs::metadata(path).map_err(|e| format!("Failed to open {}: {}", path, e))?;
    if meta.is_dir() {
        return Err(format!("{} is a directory", path));
    }

    if meta.len() >= PREVIEW_LIMIT {
        return Ok(FilePreview {
            path: path.into(),
            content: None,
            too_large: true,
        });
    }

    let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    Ok(FilePreview {
        path: path.into(),
        content: Some(String::from_utf8_lossy(&bytes).into_owned()),
        too_large: false,
    })
}
