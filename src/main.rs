//! trustfilter: keep only whitelisted CA objects in p11-kit trust-source bundles.
//!
//! This is the main entry point for the `trustfilter` CLI. It parses
//! arguments, dispatches to the selected mode, and handles errors with
//! proper exit codes.

mod cli;
mod commands;
pub mod bundle;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod interrupt;
pub mod report;
pub mod rewrite;
pub mod tagger;
pub mod whitelist;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
