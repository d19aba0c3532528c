/// Filesystem builtins
/// ls, cd, mkdir, rm, touch, cat, mv, cp, head, tail

use super::{has_flag, positional, DispatchContext, Outcome};
use crate::error::{Result, TermError};
use crate::models::FileEntry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_LINE_COUNT: usize = 10;

/// Directory entries, directories first, then by case-insensitive name
pub fn sorted_entries(dir: &Path) -> io::Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Follow symlinks so a link to a directory lists as a directory
        let meta = fs::metadata(&path).or_else(|_| entry.metadata())?;
        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: meta.is_dir(),
            size: meta.len(),
        });
    }
    entries.sort_by_cached_key(|e| (!e.is_dir, e.name.to_lowercase()));
    Ok(entries)
}

pub fn ls(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let long = has_flag(args, &["-l", "--long"]);
    let (dir, shown) = match positional(args).next() {
        Some(path) => (ctx.resolve(path), path.clone()),
        None => (ctx.cwd.clone(), ".".to_string()),
    };

    let meta = fs::metadata(&dir).map_err(|e| not_found_or_io(e, &shown))?;
    if !meta.is_dir() {
        return Err(TermError::InvalidArgument(format!("Not a directory: {}", shown)));
    }

    let entries = sorted_entries(&dir).map_err(TermError::io(format!("Cannot list {}", shown)))?;
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            if long {
                let path = dir.join(&entry.name);
                let mode = fs::metadata(&path)
                    .or_else(|_| fs::symlink_metadata(&path))
                    .map(|m| mode_string(&m))
                    .unwrap_or_else(|_| "?---------".to_string());
                format!("{}\t{}\t{}", mode, entry.size, entry.name)
            } else if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            }
        })
        .collect();

    Ok(Outcome::text(lines.join("\n")))
}

pub fn cd(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let (target, shown) = match args.first() {
        Some(path) => (ctx.resolve(path), path.clone()),
        None => {
            let home = ctx
                .workdir
                .home()
                .ok_or_else(|| TermError::NotFound("Home directory is not available".to_string()))?;
            let shown = home.display().to_string();
            (home, shown)
        }
    };

    if !target.is_dir() {
        return Err(TermError::NotFound(format!("No such directory: {}", shown)));
    }

    ctx.workdir.change(&target)?;
    let current = ctx.workdir.current()?;
    ctx.cwd = current.clone();

    Ok(Outcome {
        stdout: current.display().to_string(),
        changed_directory: Some(current),
    })
}

pub fn mkdir(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let name = required(args, 0, "mkdir requires a directory name")?;
    let path = ctx.resolve(name);

    if fs::symlink_metadata(&path).is_ok() {
        return Err(TermError::AlreadyExists(format!("File exists: {}", name)));
    }
    fs::create_dir_all(&path).map_err(TermError::io(format!("Cannot create {}", name)))?;

    Ok(Outcome::text(format!("Created {}", name)))
}

pub fn rm(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let recursive = has_flag(args, &["-r", "-rf", "-fr", "-R"]);
    let name = positional(args)
        .next()
        .ok_or_else(|| TermError::InvalidArgument("rm requires a target".to_string()))?;
    let path = ctx.resolve(name);

    // Symlinks are removed, never followed
    let meta = fs::symlink_metadata(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TermError::NotFound(format!("Target not found: {}", name)),
        _ => TermError::io(format!("Cannot access {}", name))(e),
    })?;

    if meta.is_dir() {
        if !recursive {
            return Err(TermError::IsADirectory(format!(
                "{} is a directory - use -r to remove directories",
                name
            )));
        }
        fs::remove_dir_all(&path).map_err(TermError::io(format!("Cannot remove {}", name)))?;
        Ok(Outcome::text(format!("Removed directory {}", name)))
    } else {
        fs::remove_file(&path).map_err(TermError::io(format!("Cannot remove {}", name)))?;
        Ok(Outcome::text(format!("Removed file {}", name)))
    }
}

pub fn touch(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let name = required(args, 0, "touch requires a filename")?;
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(ctx.resolve(name))
        .map_err(TermError::io(format!("Cannot touch {}", name)))?;

    Ok(Outcome::text(format!("Touched {}", name)))
}

pub fn cat(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let name = required(args, 0, "cat requires a filename")?;
    read_text(&ctx.resolve(name), name).map(Outcome::text)
}

pub fn mv(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let src_name = required(args, 0, "mv requires source and destination")?;
    let dst_name = required(args, 1, "mv requires source and destination")?;
    let src = ctx.resolve(src_name);
    let dst = into_directory(&src, ctx.resolve(dst_name));

    if let Err(e) = fs::rename(&src, &dst) {
        if !crosses_devices(&e) || !src.is_file() {
            return Err(TermError::io(format!("Cannot move {} -> {}", src_name, dst_name))(e));
        }
        // rename cannot cross filesystems; copy then remove, leaving only one of the two
        fs::copy(&src, &dst)
            .map_err(TermError::io(format!("Cannot move {} -> {}", src_name, dst_name)))?;
        if let Err(e) = fs::remove_file(&src) {
            if let Err(cleanup) = fs::remove_file(&dst) {
                log::warn!("Could not remove partial move target {}: {}", dst.display(), cleanup);
            }
            return Err(TermError::io(format!("Cannot remove {}", src_name))(e));
        }
    }

    Ok(Outcome::text(format!("Moved {} -> {}", src_name, dst_name)))
}

pub fn cp(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let src_name = required(args, 0, "cp requires source and destination")?;
    let dst_name = required(args, 1, "cp requires source and destination")?;
    let src = ctx.resolve(src_name);

    if src.is_dir() {
        return Err(TermError::IsADirectory(format!("{} is a directory", src_name)));
    }
    let dst = into_directory(&src, ctx.resolve(dst_name));

    // fs::copy carries permissions over; the modification time is copied separately
    fs::copy(&src, &dst).map_err(TermError::io(format!("Cannot copy {} -> {}", src_name, dst_name)))?;
    if let Err(e) = copy_mtime(&src, &dst) {
        log::debug!("Could not preserve modification time on {}: {}", dst.display(), e);
    }

    Ok(Outcome::text(format!("Copied {} -> {}", src_name, dst_name)))
}

pub fn head(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let (count, name) = line_args(args, "head")?;
    let text = read_text(&ctx.resolve(name), name)?;
    Ok(Outcome::text(text.lines().take(count).collect::<Vec<_>>().join("\n")))
}

pub fn tail(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let (count, name) = line_args(args, "tail")?;
    let text = read_text(&ctx.resolve(name), name)?;
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    Ok(Outcome::text(lines[start..].join("\n")))
}

/// `[-n N | -nN | -N] <file>`; an unparsable count falls back to the default
fn line_args<'a>(args: &'a [String], command: &str) -> Result<(usize, &'a str)> {
    let (file, options) = args
        .split_last()
        .ok_or_else(|| TermError::InvalidArgument(format!("{} requires a filename", command)))?;

    let mut count = DEFAULT_LINE_COUNT;
    let mut options = options.iter();
    while let Some(option) = options.next() {
        let value = if option == "-n" {
            options.next().map(String::as_str)
        } else if let Some(value) = option.strip_prefix("-n") {
            Some(value)
        } else {
            option.strip_prefix('-')
        };
        if let Some(value) = value {
            count = value.parse().unwrap_or(DEFAULT_LINE_COUNT);
        }
    }

    Ok((count, file.as_str()))
}

fn read_text(path: &Path, shown: &str) -> Result<String> {
    let meta = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TermError::NotFound(format!("File not found: {}", shown)),
        _ => TermError::io(format!("Cannot read {}", shown))(e),
    })?;
    if meta.is_dir() {
        return Err(TermError::IsADirectory(format!("{} is a directory", shown)));
    }
    let bytes = fs::read(path).map_err(TermError::io(format!("Cannot read {}", shown)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn required<'a>(args: &'a [String], index: usize, message: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| TermError::InvalidArgument(message.to_string()))
}

/// `dst` itself, or `dst/<src name>` when `dst` is an existing directory
fn into_directory(src: &Path, dst: PathBuf) -> PathBuf {
    match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst,
    }
}

#[cfg(unix)]
fn crosses_devices(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn crosses_devices(e: &io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    e.raw_os_error() == Some(17)
}

fn copy_mtime(src: &Path, dst: &Path) -> io::Result<()> {
    let modified = fs::metadata(src)?.modified()?;
    fs::OpenOptions::new().write(true).open(dst)?.set_modified(modified)
}

fn not_found_or_io(e: io::Error, shown: &str) -> TermError {
    match e.kind() {
        io::ErrorKind::NotFound => {
            TermError::NotFound(format!("No such file or directory: {}", shown))
        }
        _ => TermError::io(format!("Cannot access {}", shown))(e),
    }
}

#[cfg(unix)]
fn mode_string(meta: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = meta.permissions().mode();
    let kind = if meta.is_dir() {
        'd'
    } else if meta.file_type().is_symlink() {
        'l'
    } else {
        '-'
    };
    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn mode_string(meta: &fs::Metadata) -> String {
    let kind = if meta.is_dir() { 'd' } else { '-' };
    let write = if meta.permissions().readonly() { '-' } else { 'w' };
    format!("{}r{}-r{}-r{}-", kind, write, write, write)
}
