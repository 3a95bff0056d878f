//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Trust-source directory used by p11-kit when none is given.
pub const DEFAULT_TRUST_DIR: &str = "/etc/ca-certificates/trust-source";

/// Backup subdirectory name, relative to the trust directory.
pub const DEFAULT_BACKUP_DIR: &str = "backup";

/// File names that are never bundles (README, notes).
pub const DEFAULT_SKIP_REGEX: &str = r"(?i)(^readme|\.(txt|md)$)";

/// Configuration for a filtering run.
///
/// This struct represents the contents of the optional YAML config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the bundle files.
    pub trust_dir: PathBuf,

    /// Whitelist file. Required unless only listing all labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<PathBuf>,

    /// Backup directory; relative paths are under `trust_dir`. Empty disables backups.
    pub backup_dir: String,

    /// Regex over file names marking junk files. Empty disables the check.
    pub skip_regex: String,

    /// Suppress warnings about whitelist patterns that matched nothing.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trust_dir: PathBuf::from(DEFAULT_TRUST_DIR),
            whitelist: None,
            backup_dir: DEFAULT_BACKUP_DIR.to_string(),
            skip_regex: DEFAULT_SKIP_REGEX.to_string(),
            quiet: false,
        }
    }
}
