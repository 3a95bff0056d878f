//! Error types for the trustfilter CLI.
//!
//! Only fatal conditions are errors. Malformed bundle content is reported
//! through [`crate::diagnostics`] and never aborts a run.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for trustfilter operations.
#[derive(Error, Debug)]
pub enum TrustError {
    /// User provided invalid or incomplete arguments.
    #[error("{0}")]
    UserError(String),

    /// A config file, whitelist, pattern, or the trust directory is unusable.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading, staging, or committing a bundle file failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A signal arrived before the rewrite was committed.
    #[error("Interrupted before any changes were made")]
    Interrupted,
}

impl TrustError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            TrustError::UserError(_) => exit_codes::USER_ERROR,
            TrustError::ConfigError(_) => exit_codes::CONFIG_FAILURE,
            TrustError::IoError(_) => exit_codes::IO_FAILURE,
            TrustError::Interrupted => exit_codes::INTERRUPTED,
        }
    }
}

/// Result type alias for trustfilter operations.
pub type Result<T> = std::result::Result<T, TrustError>;
