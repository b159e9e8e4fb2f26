//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Write a file atomically: write to a temp file in the same directory, then
/// rename over the destination.
///
/// An interrupted write leaves either the previous file or no file, never a
/// partial one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("no parent directory for: {}", path.display()))?;
    ensure_dir(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in: {}", parent.display()))?;

    use std::io::Write;
    tmp.write_all(contents)
        .with_context(|| format!("failed to write temp file for: {}", path.display()))?;

    tmp.persist(path)
        .with_context(|| format!("failed to persist file: {}", path.display()))?;

    Ok(())
}
