//! Filesystem helpers that create, copy and remove paths.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{BuildError, BuildResult};

/// Absolute, canonical form of an existing path.
///
/// Fails with [`BuildError::PathNotFound`] when the path does not exist.
pub fn absolute_path(path: &Path) -> BuildResult<PathBuf> {
    if !path.exists() {
        return Err(BuildError::PathNotFound(path.to_path_buf()));
    }
    path.canonicalize().map_err(|e| BuildError::io(path, e))
}

/// Create a directory and all of its parents.
pub fn make_path(path: &Path) -> BuildResult<()> {
    fs::create_dir_all(path).map_err(|e| BuildError::io(path, e))
}

/// Remove a file, symlink or directory tree.
///
/// Returns `false` when nothing existed at `path`.
pub fn remove_path(path: &Path) -> BuildResult<bool> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(false);
    };
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| BuildError::io(path, e))?;
    Ok(true)
}

/// Copy a file, creating the destination's parent directories first.
pub fn copy_file(source: &Path, destination: &Path) -> BuildResult<()> {
    if let Some(parent) = destination.parent() {
        make_path(parent)?;
    }
    fs::copy(source, destination).map_err(|e| BuildError::io(source, e))?;
    Ok(())
}

/// Write a file, creating the parent directories first.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> BuildResult<()> {
    if let Some(parent) = path.parent() {
        make_path(parent)?;
    }
    fs::write(path, contents).map_err(|e| BuildError::io(path, e))
}

/// Read a file as text with normalized contents.
pub fn read_normalized(path: &Path) -> BuildResult<String> {
    let bytes = fs::read(path).map_err(|e| BuildError::io(path, e))?;
    Ok(crate::utils::text::normalize_contents(&String::from_utf8_lossy(
        &bytes,
    )))
}
