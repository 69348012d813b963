//! File I/O primitives with consistent error handling.
//!
//! Every failure maps to `Error::internal_io` with the operation name as
//! context, so a fatal step reports which file it was touching.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

fn io_error(e: std::io::Error, operation: &str, path: &Path) -> Error {
    Error::internal_io(
        e.to_string(),
        Some(format!("{} {}", operation, path.display())),
    )
}

/// Read a UTF-8 text file.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| io_error(e, operation, path))
}

/// Write content to file atomically (write to .tmp, then rename).
///
/// Readers see either the old content or the new content, never a partial
/// write.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content).map_err(|e| io_error(e, operation, &tmp_path))?;
    fs::rename(&tmp_path, path).map_err(|e| io_error(e, operation, path))?;

    Ok(())
}

/// Copy a single file, overwriting the destination.
pub fn copy_file(from: &Path, to: &Path, operation: &str) -> Result<u64> {
    fs::copy(from, to).map_err(|e| io_error(e, operation, from))
}

/// Rename a file, falling back to copy + delete across filesystems.
pub fn move_file(from: &Path, to: &Path, operation: &str) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    copy_file(from, to, operation)?;
    fs::remove_file(from).map_err(|e| io_error(e, operation, from))
}

pub fn create_dir_all(dir: &Path, operation: &str) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| io_error(e, operation, dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_file_returns_io_error_with_context() {
        let err = read_file(Path::new("/nonexistent/Makefile"), "read").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(err.details["context"], "read /nonexistent/Makefile");
    }

    #[test]
    fn write_file_atomic_replaces_content_and_leaves_no_tmp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book-src.txt");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new", "rewrite").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("book-src.txt.tmp").exists());
    }

    #[test]
    fn move_file_relocates_content() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("text.zip");
        let to_dir = dir.path().join("originals");
        fs::create_dir(&to_dir).unwrap();
        fs::write(&from, b"PK").unwrap();

        move_file(&from, &to_dir.join("text.zip"), "move").unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read(to_dir.join("text.zip")).unwrap(), b"PK");
    }

    #[test]
    fn copy_file_missing_source_fails() {
        let dir = tempdir().unwrap();
        let result = copy_file(
            &dir.path().join("projectIDabc.txt"),
            &dir.path().join("out.txt"),
            "copy",
        );
        assert!(result.is_err());
    }
}
