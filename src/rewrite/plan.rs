//! Deferred filesystem operations for a run.
//!
//! Nothing in the trust directory changes while bundles are being processed.
//! Each file's work is recorded as [`PendingOperation`]s; rewritten content is
//! staged into temporary files next to its target. Only after every file has
//! been processed does [`Transaction::commit`] apply the list in order.
//!
//! Dropping a transaction without committing removes every staged temporary
//! file, so any early return leaves the directory as it was. A failure
//! partway through `commit` can leave some operations applied; bundle files
//! are independent, so the directory is still a valid trust store.

use crate::error::{Result, TrustError};
use crate::fs::{atomic_replace, atomic_write, create_private_dir, relocate_file, stage_file, temp_path_for};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A planned filesystem mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOperation {
    /// Copy the live `source` to `target` in the backup directory.
    Backup { source: PathBuf, target: PathBuf },
    /// Rename the staged `temp` file over `target`.
    Replace { temp: PathBuf, target: PathBuf },
    /// Remove `target` from the trust directory.
    Delete { target: PathBuf },
    /// Move `source` out of the trust directory to `target`.
    MoveToBackup { source: PathBuf, target: PathBuf },
}

impl fmt::Display for PendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingOperation::Backup { source, target } => {
                write!(f, "backup {} -> {}", source.display(), target.display())
            }
            PendingOperation::Replace { target, .. } => write!(f, "rewrite {}", target.display()),
            PendingOperation::Delete { target } => write!(f, "delete {}", target.display()),
            PendingOperation::MoveToBackup { source, target } => {
                write!(f, "move {} -> {}", source.display(), target.display())
            }
        }
    }
}

/// Ordered list of pending operations plus the temporary files staged for them.
#[derive(Debug)]
pub struct Transaction {
    operations: Vec<PendingOperation>,
    staged: Vec<PathBuf>,
    /// When set, nothing is staged and `commit` is never reached.
    dry_run: bool,
}

impl Transaction {
    pub fn new(dry_run: bool) -> Self {
        Self {
            operations: Vec::new(),
            staged: Vec::new(),
            dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn operations(&self) -> &[PendingOperation] {
        &self.operations
    }

    /// Temporary files created so far.
    pub fn staged(&self) -> &[PathBuf] {
        &self.staged
    }

    pub fn backup(&mut self, source: &Path, target: PathBuf) {
        self.operations.push(PendingOperation::Backup {
            source: source.to_path_buf(),
            target,
        });
    }

    /// Stage `content` as the future content of `target`.
    ///
    /// In dry-run mode the content is discarded and only the plan is recorded.
    pub fn replace(&mut self, target: &Path, content: &[u8]) -> Result<()> {
        let temp = if self.dry_run {
            temp_path_for(target)?
        } else {
            let temp = stage_file(target, content)?;
            self.staged.push(temp.clone());
            temp
        };

        self.operations.push(PendingOperation::Replace {
            temp,
            target: target.to_path_buf(),
        });
        Ok(())
    }

    pub fn delete(&mut self, target: &Path) {
        self.operations.push(PendingOperation::Delete {
            target: target.to_path_buf(),
        });
    }

    pub fn move_to_backup(&mut self, source: &Path, target: PathBuf) {
        self.operations.push(PendingOperation::MoveToBackup {
            source: source.to_path_buf(),
            target,
        });
    }

    /// Apply every operation in order.
    ///
    /// Returns the number of operations applied. A dry-run transaction
    /// applies nothing.
    pub fn commit(mut self) -> Result<usize> {
        if self.dry_run {
            return Ok(0);
        }

        let operations = std::mem::take(&mut self.operations);
        let count = operations.len();
        for operation in operations {
            apply(operation)?;
        }

        Ok(count)
    }

    /// Abandon the plan and remove staged files.
    pub fn rollback(self) {
        drop(self);
    }

    fn remove_staged(&mut self) {
        for temp in self.staged.drain(..) {
            if temp.is_file() {
                let _ = fs::remove_file(&temp);
            }
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        self.remove_staged();
    }
}

fn apply(operation: PendingOperation) -> Result<()> {
    match operation {
        PendingOperation::Backup { source, target } => {
            ensure_backup_parent(&target)?;
            let content = fs::read(&source).map_err(|e| {
                TrustError::IoError(format!(
                    "failed to read '{}' for backup: {}",
                    source.display(),
                    e
                ))
            })?;
            atomic_write(&target, &content)
        }
        PendingOperation::Replace { temp, target } => atomic_replace(&temp, &target),
        PendingOperation::Delete { target } => match fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TrustError::IoError(format!(
                "failed to delete '{}': {}",
                target.display(),
                e
            ))),
        },
        PendingOperation::MoveToBackup { source, target } => {
            ensure_backup_parent(&target)?;
            relocate_file(&source, &target)
        }
    }
}

fn ensure_backup_parent(target: &Path) -> Result<()> {
    match target.parent() {
        Some(parent) => create_private_dir(parent),
        None => Ok(()),
    }
}
