//! Local file operations used while laying out a project.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io;

#[cfg(windows)]
const NATIVE_EOL: &str = "\r\n";
#[cfg(not(windows))]
const NATIVE_EOL: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CopyOutcome {
    Copied,
    /// Destination was already present; nothing was copied.
    AlreadyExists,
}

/// Recursively copy `src` to a new directory `dst`.
///
/// An existing `dst` is left untouched and reported as
/// [`CopyOutcome::AlreadyExists`]; a missing `src` is an error.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<CopyOutcome> {
    if dst.exists() {
        return Ok(CopyOutcome::AlreadyExists);
    }
    if !src.is_dir() {
        return Err(Error::internal_io(
            format!("Template directory not found: {}", src.display()),
            Some("copy template".to_string()),
        ));
    }

    copy_dir_recursive(src, dst)?;
    Ok(CopyOutcome::Copied)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    io::create_dir_all(dst, "create target dir")?;

    for entry in fs::read_dir(src)
        .map_err(|e| Error::internal_io(e.to_string(), Some("read source dir".into())))?
    {
        let entry =
            entry.map_err(|e| Error::internal_io(e.to_string(), Some("read dir entry".into())))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            copy_file(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Copy one file, replacing `dst` if present.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    io::copy_file(src, dst, "copy file")
}

/// Regular files directly inside `dir` whose names match `pattern`, sorted.
pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}/{}", escaped, pattern);

    let mut files: Vec<PathBuf> = glob::glob(&full)
        .map_err(|e| {
            Error::internal_unexpected(format!("Invalid glob pattern '{}': {}", full, e))
        })?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();

    files.sort();
    Ok(files)
}

/// Move each file into `dir`, keeping its file name. Stops at the first
/// failure.
pub fn move_into(files: &[PathBuf], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut moved = Vec::with_capacity(files.len());

    for file in files {
        let name = file.file_name().ok_or_else(|| {
            Error::internal_io(
                format!("Invalid path: {}", file.display()),
                Some("move file".to_string()),
            )
        })?;
        let target = dir.join(name);

        tracing::debug!("Moving file {} to {}", file.display(), dir.display());
        io::move_file(file, &target, "move file")?;
        moved.push(target);
    }

    Ok(moved)
}

/// Delete a file. Returns `false` if there was nothing to delete.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::internal_io(
            e.to_string(),
            Some(format!("delete {}", path.display())),
        )),
    }
}

/// Insert `line` as the new first line of a text file.
pub fn prepend_line(path: &Path, line: &str) -> Result<()> {
    let content = io::read_file(path, "read")?;
    let updated = format!("{}{}{}", line, NATIVE_EOL, content);
    io::write_file_atomic(path, &updated, "prepend line")
}

/// Rewrite a text file with native line endings.
///
/// Handles CRLF, lone CR and LF input. The file must be valid UTF-8.
pub fn normalize_line_endings(path: &Path) -> Result<()> {
    let content = io::read_file(path, "read")?;
    io::write_file_atomic(path, &to_native_eol(&content), "normalize line endings")
}

fn to_native_eol(content: &str) -> String {
    let unix = content.replace("\r\n", "\n").replace('\r', "\n");
    if NATIVE_EOL == "\n" {
        unix
    } else {
        unix.replace('\n', NATIVE_EOL)
    }
}
