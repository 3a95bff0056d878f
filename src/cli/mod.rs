//! CLI argument parsing for trustfilter.
//!
//! Uses clap derive macros for declarative argument definitions. Path and
//! regex options are optional here so that values from a `--config` file
//! are only overridden when a flag is actually given.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Filter p11-kit trust-source bundles down to a whitelist of CA labels.
///
/// Every bundle in the trust directory is rewritten in place to keep only
/// objects whose label matches a whitelist pattern. Originals are kept in
/// the backup directory, and re-running with the same whitelist is a no-op.
#[derive(Parser, Debug)]
#[command(name = "trustfilter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the trust-source bundles
    /// [default: /etc/ca-certificates/trust-source].
    #[arg(short = 'd', long, value_name = "DIR")]
    pub trust_dir: Option<PathBuf>,

    /// File with one label glob per line; `#` starts a comment.
    #[arg(short, long, value_name = "FILE")]
    pub whitelist: Option<PathBuf>,

    /// Backup directory, relative to the trust directory. An empty value
    /// disables backups [default: backup].
    #[arg(short, long, value_name = "NAME")]
    pub backup_dir: Option<String>,

    /// File names matching this regex are moved aside without parsing.
    #[arg(long, value_name = "REGEX")]
    pub skip_regex: Option<String>,

    /// YAML file with defaults for the options above.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include certificate fingerprints and subject attributes in listings.
    /// Implies --list when no listing flag is given.
    #[arg(short, long)]
    pub print: bool,

    /// List the labels that pass the whitelist. Does not modify anything.
    #[arg(short, long, conflicts_with = "list_all")]
    pub list: bool,

    /// List every label in the trust directory. No whitelist needed.
    #[arg(short = 'L', long)]
    pub list_all: bool,

    /// Show what would be changed without touching the trust directory.
    #[arg(short = 'n', long, conflicts_with_all = ["list", "list_all"])]
    pub dry_run: bool,

    /// Suppress warnings about unused whitelist patterns.
    #[arg(short, long)]
    pub quiet: bool,

    /// Render listings as JSON. Implies --list when no listing flag is given.
    #[arg(long)]
    pub json: bool,
}

/// What a run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Filter and rewrite the trust directory.
    Rewrite,
    /// List labels passing the whitelist.
    List,
    /// List every label.
    ListAll,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn mode(&self) -> Mode {
        if self.list_all {
            Mode::ListAll
        } else if self.list || ((self.print || self.json) && !self.dry_run) {
            Mode::List
        } else {
            Mode::Rewrite
        }
    }

    /// Overlay flags that were given onto `config`.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(trust_dir) = &self.trust_dir {
            config.trust_dir = trust_dir.clone();
        }
        if let Some(whitelist) = &self.whitelist {
            config.whitelist = Some(whitelist.clone());
        }
        if let Some(backup_dir) = &self.backup_dir {
            config.backup_dir = backup_dir.clone();
        }
        if let Some(skip_regex) = &self.skip_regex {
            config.skip_regex = skip_regex.clone();
        }
        if self.quiet {
            config.quiet = true;
        }
    }
}
