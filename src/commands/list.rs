//! Implementation of `--list`, `--list-all`, and `--print`.
//!
//! Listing reads the trust directory but never modifies it.

use crate::bundle::LabelMap;
use crate::context::TrustContext;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::report::{self, build_report, default_inspector, render_json, render_text};
use crate::rewrite::{BundleFile, file_name_of, list_bundle_files};
use crate::whitelist::{UsedPatterns, Whitelist};
use regex::Regex;

/// Render the labels of the trust directory, filtered when a whitelist is given.
pub fn cmd_list(
    ctx: &TrustContext,
    whitelist: Option<&Whitelist>,
    skip: Option<&Regex>,
    print: bool,
    json: bool,
    diagnostics: &mut Diagnostics,
) -> Result<String> {
    let labels = collect_labels(ctx, whitelist, skip, diagnostics)?;

    let inspector = if print { default_inspector() } else { None };
    let report = build_report(&labels, inspector.as_deref(), diagnostics);

    if json {
        let mut output = render_json(&report)?;
        output.push('\n');
        Ok(output)
    } else {
        Ok(render_text(&report))
    }
}

/// Parse every bundle (skipping junk files) and merge the results.
pub fn collect_labels(
    ctx: &TrustContext,
    whitelist: Option<&Whitelist>,
    skip: Option<&Regex>,
    diagnostics: &mut Diagnostics,
) -> Result<LabelMap> {
    ctx.ensure_trust_dir()?;

    let mut maps = Vec::new();
    let mut used = UsedPatterns::default();

    for path in list_bundle_files(ctx)? {
        let name = file_name_of(&path);
        if skip.is_some_and(|re| re.is_match(&name)) {
            continue;
        }

        let mut bundle = BundleFile::read(&path)?;
        bundle.parse(diagnostics);
        match whitelist {
            Some(whitelist) => {
                let (filtered, file_used) = whitelist.filter(&bundle.labels);
                used.extend(&file_used);
                maps.push(filtered);
            }
            None => maps.push(bundle.labels),
        }
    }

    if let Some(whitelist) = whitelist {
        whitelist.report_unused(&used, diagnostics);
    }

    Ok(report::aggregate(maps))
}
