//! Staged writes and atomic replacement for bundle files.
//!
//! Rewriting a bundle is split in two so a whole run can be committed or
//! abandoned as a unit:
//! 1. [`stage_file`] writes the new content to a temporary file in the same
//!    directory as the target and syncs it to disk.
//! 2. [`atomic_replace`] renames the temporary file over the target.
//!
//! [`atomic_write`] does both at once and is used for backup copies.
//!
//! # Important Notes
//!
//! - Source and destination must be on the same filesystem for atomic rename
//! - On crash, a temporary file may remain (named `.{filename}.tmp`)
//! - Staged files take the permissions of the file they will replace

use crate::error::{Result, TrustError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file.
///
/// The parent directory must already exist.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let temp_path = stage_file(path, content)?;
    atomic_replace(&temp_path, path)
}

/// Write `content` to the temporary sibling of `target` and sync it.
///
/// Returns the temporary path. On failure nothing is left behind.
pub fn stage_file(target: &Path, content: &[u8]) -> Result<PathBuf> {
    let temp_path = temp_path_for(target)?;

    write_and_sync(&temp_path, content)?;

    if let Ok(metadata) = fs::metadata(target) {
        fs::set_permissions(&temp_path, metadata.permissions()).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TrustError::IoError(format!(
                "failed to copy permissions to '{}': {}",
                temp_path.display(),
                e
            ))
        })?;
    }

    Ok(temp_path)
}

/// Temporary path in the same directory as the target: `.{filename}.tmp`.
pub fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            TrustError::IoError(format!("invalid file path '{}'", target.display()))
        })?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

/// Write content to a file and sync to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        TrustError::IoError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(path);
        TrustError::IoError(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(path);
        TrustError::IoError(format!(
            "failed to sync temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Rename `source` over `target`, then sync the parent directory.
///
/// `std::fs::rename` replaces an existing target on every supported platform.
pub fn atomic_replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        TrustError::IoError(format!(
            "failed to atomically replace '{}': {}",
            target.display(),
            e
        ))
    })?;

    sync_parent_dir(target);

    Ok(())
}

/// Persist the directory entry of a freshly renamed file.
#[cfg(unix)]
fn sync_parent_dir(target: &Path) {
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_target: &Path) {}
