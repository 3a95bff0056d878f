//! Command implementations for trustfilter.
//!
//! [`dispatch`] merges configuration, picks the run mode, and prints the
//! result. The mode handlers return their stdout text so they can be
//! tested without capturing the process output.

mod filter;
mod list;


use crate::cli::{Cli, Mode};
use crate::config::Config;
use crate::context::TrustContext;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TrustError};
use crate::whitelist::Whitelist;
use std::env;
use std::path::Path;

/// Run the command described by `cli` in the current working directory.
///
/// Diagnostics are written to stderr even when the run fails.
pub fn dispatch(cli: Cli) -> Result<()> {
    let cwd = env::current_dir().map_err(|e| {
        TrustError::ConfigError(format!("failed to get current working directory: {}", e))
    })?;

    let mut diagnostics = Diagnostics::new();
    let result = execute(&cli, &cwd, &mut diagnostics);

    let quiet = match &result {
        Ok(run) => run.quiet,
        Err(_) => cli.quiet,
    };
    diagnostics.flush(quiet);

    let run = result?;
    print!("{}", run.output);
    Ok(())
}

/// Output of a completed run.
#[derive(Debug)]
pub(crate) struct RunOutput {
    /// Text for stdout.
    pub output: String,
    /// Effective quiet setting after merging the config file.
    pub quiet: bool,
}

/// Run `cli` with relative paths resolved against `cwd`.
pub(crate) fn execute(cli: &Cli, cwd: &Path, diagnostics: &mut Diagnostics) -> Result<RunOutput> {
    let config = load_config(cli, cwd)?;
    let ctx = TrustContext::resolve_from(cwd, &config)?;
    let skip = config.skip_matcher()?;
    let mode = cli.mode();

    let whitelist = match (&ctx.whitelist, mode) {
        (_, Mode::ListAll) => None,
        (Some(path), _) => Some(Whitelist::load(path)?),
        (None, _) => {
            return Err(TrustError::UserError(
                "a whitelist is required; pass --whitelist <FILE> or set `whitelist` in the config file"
                    .to_string(),
            ));
        }
    };

    let output = match (mode, &whitelist) {
        (Mode::Rewrite, Some(whitelist)) => filter::cmd_filter(
            &ctx,
            whitelist,
            skip.as_ref(),
            cli.dry_run,
            diagnostics,
        )?,
        _ => list::cmd_list(
            &ctx,
            whitelist.as_ref(),
            skip.as_ref(),
            cli.print,
            cli.json,
            diagnostics,
        )?,
    };

    Ok(RunOutput {
        output,
        quiet: config.quiet,
    })
}

/// Defaults, then the config file, then command-line flags.
fn load_config(cli: &Cli, cwd: &Path) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(cwd.join(path))?,
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}
