//! Configuration model for trustfilter.
//!
//! Settings come from three layers: built-in defaults, an optional YAML
//! config file (`--config`), and command-line flags. Later layers win.
//! Unknown YAML keys are ignored for forward compatibility.

mod model;
mod operations;

#[cfg(test)]
mod tests;

pub use model::{Config, DEFAULT_BACKUP_DIR, DEFAULT_SKIP_REGEX, DEFAULT_TRUST_DIR};
