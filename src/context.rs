//! Path resolution for a filtering run.
//!
//! Turns the merged [`Config`] into absolute paths:
//! - the trust directory, relative to the working directory
//! - the backup directory, relative to the trust directory (or disabled)
//! - the whitelist file, relative to the working directory

use crate::config::Config;
use crate::error::{Result, TrustError};
use std::env;
use std::path::{Path, PathBuf};

/// Suffix appended to backup copies of original bundle files.
pub const BACKUP_SUFFIX: &str = ".old";

/// Resolved paths for a trustfilter run. All paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustContext {
    /// Directory containing the bundle files.
    pub trust_dir: PathBuf,

    /// Where originals are preserved, or `None` when backups are disabled.
    pub backup_dir: Option<PathBuf>,

    /// Whitelist file, if one was configured.
    pub whitelist: Option<PathBuf>,
}

impl TrustContext {
    /// Resolve paths against the current working directory.
    pub fn resolve(config: &Config) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            TrustError::ConfigError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd, config)
    }

    /// Resolve paths against a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P, config: &Config) -> Result<Self> {
        let cwd = cwd.as_ref();

        let trust_dir = absolutize(cwd, &config.trust_dir);
        let backup_dir = config
            .backups_enabled()
            .then(|| absolutize(&trust_dir, Path::new(config.backup_dir.trim())));
        let whitelist = config.whitelist.as_deref().map(|p| absolutize(cwd, p));

        Ok(Self {
            trust_dir,
            backup_dir,
            whitelist,
        })
    }

    /// Fail unless the trust directory exists and is a directory.
    pub fn ensure_trust_dir(&self) -> Result<()> {
        if !self.trust_dir.is_dir() {
            return Err(TrustError::ConfigError(format!(
                "trust directory not found: {}",
                self.trust_dir.display()
            )));
        }
        Ok(())
    }

    /// Backup location for a bundle file name: `<backup_dir>/<name>.old`.
    pub fn backup_path_for(&self, file_name: &str) -> Option<PathBuf> {
        self.backup_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}{}", file_name, BACKUP_SUFFIX)))
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
