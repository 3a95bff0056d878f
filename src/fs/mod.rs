//! Filesystem utilities for trustfilter.
//!
//! Staged writes, atomic replacement, cross-device moves, and creation of
//! the owner-only backup directory.

pub mod atomic;
mod relocate;

pub use atomic::{atomic_replace, atomic_write, stage_file, temp_path_for};
pub use relocate::relocate_file;

use crate::error::{Result, TrustError};
use std::path::Path;

/// Create `path` (and missing parents) with owner-only permissions.
///
/// An existing directory is left as it is.
pub fn create_private_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder.create(path).map_err(|e| {
        TrustError::IoError(format!(
            "failed to create backup directory '{}': {}",
            path.display(),
            e
        ))
    })
}
