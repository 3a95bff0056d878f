//! Implementation of the default filtering run and `--dry-run`.

use crate::context::TrustContext;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::interrupt::{Interrupt, InterruptGuard};
use crate::rewrite::{FileOutcome, FileReport, RunSummary, rewrite_trust_dir};
use crate::whitelist::Whitelist;
use regex::Regex;
use std::fmt::Write as _;

/// Rewrite the trust directory. Returns the plan for dry runs and nothing otherwise.
///
/// SIGINT and SIGTERM abort the run before the commit phase with staged
/// files removed.
pub fn cmd_filter(
    ctx: &TrustContext,
    whitelist: &Whitelist,
    skip: Option<&Regex>,
    dry_run: bool,
    diagnostics: &mut Diagnostics,
) -> Result<String> {
    let interrupt = Interrupt::new();
    let _guard = InterruptGuard::install(&interrupt)?;

    let summary = rewrite_trust_dir(ctx, whitelist, skip, dry_run, &interrupt, diagnostics)?;

    if dry_run {
        Ok(render_plan(ctx, &summary))
    } else {
        Ok(String::new())
    }
}

/// Per-file actions followed by the filesystem operations they expand to.
pub fn render_plan(ctx: &TrustContext, summary: &RunSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Dry run: no changes made to {}",
        ctx.trust_dir.display()
    );
    for file in &summary.files {
        let _ = writeln!(out, "  {}", describe(file));
    }

    if !summary.operations.is_empty() {
        out.push('\n');
        out.push_str("Planned operations:\n");
        for operation in &summary.operations {
            let _ = writeln!(out, "  {}", operation);
        }
    }

    out
}

fn describe(file: &FileReport) -> String {
    let mut line = match file.outcome {
        FileOutcome::Rewritten { labels, objects } => format!(
            "{:<10} {} ({} label(s), {} object(s))",
            "rewrite", file.name, labels, objects
        ),
        FileOutcome::Unchanged { labels } => {
            format!("{:<10} {} ({} label(s))", "unchanged", file.name, labels)
        }
        FileOutcome::Deleted => format!("{:<10} {}", "delete", file.name),
        FileOutcome::Discarded => format!("{:<10} {}", "discard", file.name),
    };

    if file.backed_up {
        line.push_str(", backup");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_outcomes() {
        let file = |outcome, backed_up| FileReport {
            name: "ca.p11-kit".to_string(),
            outcome,
            is_origin: true,
            backed_up,
        };

        assert_eq!(
            describe(&file(
                FileOutcome::Rewritten {
                    labels: 2,
                    objects: 3
                },
                true
            )),
            "rewrite    ca.p11-kit (2 label(s), 3 object(s)), backup"
        );
        assert_eq!(
            describe(&file(FileOutcome::Unchanged { labels: 1 }, false)),
            "unchanged  ca.p11-kit (1 label(s))"
        );
        assert_eq!(
            describe(&file(FileOutcome::Deleted, false)),
            "delete     ca.p11-kit"
        );
        assert_eq!(
            describe(&file(FileOutcome::Discarded, true)),
            "discard    ca.p11-kit, backup"
        );
    }
}
