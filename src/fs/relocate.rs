//! Moving junk files into the backup directory.
//!
//! The backup directory may be on another filesystem than the trust
//! directory, in which case `rename` fails with `EXDEV` and the file is
//! copied next to its destination, swapped in, and the original removed.

use crate::error::{Result, TrustError};
use crate::fs::{atomic_replace, temp_path_for};
use std::fs;
use std::io;
use std::path::Path;

/// Move `source` to `target`, replacing any file already at `target`.
pub fn relocate_file(source: &Path, target: &Path) -> Result<()> {
    let Err(err) = fs::rename(source, target) else {
        return Ok(());
    };

    if crosses_devices(&err) {
        copy_then_remove(source, target)
    } else {
        Err(relocate_error(source, target, &err))
    }
}

/// Copy with permissions into a staged sibling of `target`, replace, then
/// delete `source`.
fn copy_then_remove(source: &Path, target: &Path) -> Result<()> {
    let staged = temp_path_for(target)?;

    if let Err(err) = fs::copy(source, &staged) {
        let _ = fs::remove_file(&staged);
        return Err(relocate_error(source, target, &err));
    }
    atomic_replace(&staged, target)?;

    fs::remove_file(source).map_err(|e| {
        TrustError::IoError(format!(
            "copied '{}' to '{}' but could not remove the original: {}",
            source.display(),
            target.display(),
            e
        ))
    })
}

fn crosses_devices(err: &io::Error) -> bool {
    const EXDEV: i32 = 18;
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(EXDEV)
}

fn relocate_error(source: &Path, target: &Path, err: &io::Error) -> TrustError {
    TrustError::IoError(format!(
        "cannot move '{}' to '{}': {}",
        source.display(),
        target.display(),
        err
    ))
}
