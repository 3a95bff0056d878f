//! Exit code constants for the trustfilter CLI.
//!
//! - 0: Success (including runs that only produced parse diagnostics)
//! - 1: User error (bad or missing arguments)
//! - 2: Configuration failure (config file, whitelist, patterns, trust dir)
//! - 3: I/O failure while reading bundles or applying the rewrite
//! - 130: Interrupted by SIGINT or SIGTERM before anything was changed

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or a required argument is missing.
pub const USER_ERROR: i32 = 1;

/// Configuration failure: unreadable or invalid config, whitelist, or trust directory.
pub const CONFIG_FAILURE: i32 = 2;

/// I/O failure: a bundle could not be read, staged, or committed.
pub const IO_FAILURE: i32 = 3;

/// Interrupted by a signal; the trust directory was left as it was.
pub const INTERRUPTED: i32 = 130;
