//! Atomic rewriting of a trust directory.
//!
//! For each bundle file, in name order:
//! 1. Detect whether it is an origin file or our own earlier output
//! 2. Junk files (by name) are planned for removal without parsing
//! 3. Parse and filter against the whitelist
//! 4. Plan a delete when nothing survives, otherwise stage the filtered
//!    content with a fresh generated header
//! 5. Plan a backup of origin files before they are replaced or deleted
//!
//! The plan is committed only after every file succeeded.

mod engine;
mod origin;
mod plan;


pub use engine::{
    BundleFile, FileOutcome, FileReport, Rewriter, RunSummary, file_name_of, list_bundle_files,
    rewrite_trust_dir,
};
pub use origin::{Origin, TOOL_NAME, detect_origin, header_line, render_generated};
pub use plan::{PendingOperation, Transaction};
