//! Whole-file reads and atomic replacement.

use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;

use super::RewriteError;

/// Reads a file into a string, mapping failures to [`RewriteError::Read`].
pub(super) fn read(path: &Path) -> Result<String, RewriteError> {
    std::fs::read_to_string(path).map_err(|source| RewriteError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces the contents of `path` with `content`.
///
/// Uses the write-to-temp-then-rename pattern:
/// 1. Create a uniquely named 0600 temp file next to `path`
/// 2. Copy the permissions of the existing file (if any) onto it
/// 3. Write `content` and rename the temp file over `path`
///
/// Readers (the IPsec daemon in particular) never observe a half-written file,
/// a 0600 secrets file stays 0600, and the temp file is removed on failure.
pub(super) fn replace(path: &Path, content: &str) -> Result<(), RewriteError> {
    let write_error = |source| RewriteError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = staging_file(path).map_err(write_error)?;
    temp.write_all(content.as_bytes()).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;

    Ok(())
}

/// Creates the temp file for `path`, carrying over the mode of the current file.
fn staging_file(path: &Path) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir)?;

    match std::fs::metadata(path) {
        Ok(metadata) => temp.as_file().set_permissions(metadata.permissions())?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    Ok(temp)
}
