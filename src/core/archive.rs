//! Zip archive extraction.

use std::fs::File;
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::io;

/// Unpack every entry of `archive` into `dest`, creating it if needed.
///
/// Returns the number of entries in the archive. Entry names are sanitized by
/// the zip reader, so nothing is written outside `dest`.
pub fn extract(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("open {}", archive.display())))
    })?;

    let mut zip = ZipArchive::new(file)
        .map_err(|e| Error::archive_invalid(archive.display().to_string(), e.to_string()))?;

    io::create_dir_all(dest, "create extraction dir")?;

    zip.extract(dest)
        .map_err(|e| Error::archive_invalid(archive.display().to_string(), e.to_string()))?;

    Ok(zip.len())
}
