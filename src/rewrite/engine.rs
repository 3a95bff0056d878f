//! Per-file processing and the run loop.

use super::origin::{detect_origin, render_generated};
use super::plan::Transaction;
use crate::bundle::{self, LabelMap};
use crate::context::TrustContext;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TrustError};
use crate::interrupt::Interrupt;
use crate::whitelist::{UsedPatterns, Whitelist};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// One file from the trust directory.
#[derive(Debug, Clone)]
pub struct BundleFile {
    pub path: PathBuf,
    pub name: String,
    /// Raw bytes as read from disk.
    pub content: Vec<u8>,
    /// False when the content is verified output of a previous run.
    pub is_origin: bool,
    /// Start of the parseable body within `content`.
    body_offset: usize,
    /// Objects parsed from this file alone.
    pub labels: LabelMap,
}

impl BundleFile {
    /// Read a bundle and detect whether it is an origin file. Does not parse.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read(path).map_err(|e| {
            TrustError::IoError(format!(
                "failed to read bundle '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::from_content(path, content))
    }

    pub fn from_content(path: &Path, content: Vec<u8>) -> Self {
        let origin = detect_origin(&content);
        let is_origin = origin.is_origin;
        let body_offset = content.len() - origin.body.len();

        Self {
            path: path.to_path_buf(),
            name: file_name_of(path),
            content,
            is_origin,
            body_offset,
            labels: LabelMap::new(),
        }
    }

    /// The part of the content that gets parsed.
    pub fn body(&self) -> &[u8] {
        &self.content[self.body_offset..]
    }

    /// Parse the body into `labels`, reporting problems to `diagnostics`.
    pub fn parse(&mut self, diagnostics: &mut Diagnostics) {
        self.labels = bundle::parse_bytes(self.body(), &self.name, diagnostics);
    }
}

/// What happens to a file when the run commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Replaced with filtered content.
    Rewritten { labels: usize, objects: usize },
    /// Already generated with identical content.
    Unchanged { labels: usize },
    /// Nothing matched the whitelist; the live file is removed.
    Deleted,
    /// Name matched the skip regex; moved to backup or removed unparsed.
    Discarded,
}

/// Per-file line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub outcome: FileOutcome,
    pub is_origin: bool,
    /// Whether the original is copied or moved to the backup directory.
    pub backed_up: bool,
}

/// Result of a completed run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    /// Planned operations, rendered for display.
    pub operations: Vec<String>,
    /// Number of operations applied; zero for dry runs.
    pub applied: usize,
}

/// Filters and rewrites the files of one trust directory.
///
/// All filesystem changes go through the internal [`Transaction`]; dropping
/// a `Rewriter` before [`Rewriter::finish`] leaves the directory untouched.
/// A raised [`Interrupt`] fails the next file and the commit.
pub struct Rewriter<'a> {
    ctx: &'a TrustContext,
    whitelist: &'a Whitelist,
    skip: Option<&'a Regex>,
    interrupt: Interrupt,
    transaction: Transaction,
    used: UsedPatterns,
    files: Vec<FileReport>,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        ctx: &'a TrustContext,
        whitelist: &'a Whitelist,
        skip: Option<&'a Regex>,
        dry_run: bool,
    ) -> Self {
        Self {
            ctx,
            whitelist,
            skip,
            interrupt: Interrupt::new(),
            transaction: Transaction::new(dry_run),
            used: UsedPatterns::default(),
            files: Vec::new(),
        }
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Whitelist usage accumulated over the files processed so far.
    pub fn used_patterns(&self) -> &UsedPatterns {
        &self.used
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Read, parse, filter, and plan the rewrite of one file.
    ///
    /// Junk files are planned from their name alone and never opened.
    pub fn process_path(&mut self, path: &Path, diagnostics: &mut Diagnostics) -> Result<FileOutcome> {
        self.interrupt.check()?;

        let name = file_name_of(path);
        if self.is_junk(&name) {
            return Ok(self.discard(path, &name));
        }

        let bundle = BundleFile::read(path)?;
        self.process_file(bundle, diagnostics)
    }

    /// Plan the rewrite of an already-read file.
    pub fn process_file(
        &mut self,
        mut bundle: BundleFile,
        diagnostics: &mut Diagnostics,
    ) -> Result<FileOutcome> {
        if self.is_junk(&bundle.name) {
            return Ok(self.discard(&bundle.path, &bundle.name));
        }

        let backup_target = self.ctx.backup_path_for(&bundle.name);

        bundle.parse(diagnostics);
        let (filtered, used) = self.whitelist.filter(&bundle.labels);
        self.used.extend(&used);

        let back_up = bundle.is_origin && backup_target.is_some();

        if filtered.is_empty() {
            if let Some(target) = backup_target.filter(|_| back_up) {
                self.transaction.backup(&bundle.path, target);
            }
            self.transaction.delete(&bundle.path);
            return Ok(self.record(&bundle, FileOutcome::Deleted, back_up));
        }

        let generated = render_generated(&bundle.name, &filtered);
        if !bundle.is_origin && generated == bundle.content {
            let outcome = FileOutcome::Unchanged {
                labels: filtered.len(),
            };
            return Ok(self.record(&bundle, outcome, false));
        }

        if let Some(target) = backup_target.filter(|_| back_up) {
            self.transaction.backup(&bundle.path, target);
        }
        self.transaction.replace(&bundle.path, &generated)?;

        let outcome = FileOutcome::Rewritten {
            labels: filtered.len(),
            objects: bundle::object_count(&filtered),
        };
        Ok(self.record(&bundle, outcome, back_up))
    }

    fn is_junk(&self, name: &str) -> bool {
        self.skip.is_some_and(|re| re.is_match(name))
    }

    /// Plan moving a junk file to the backup directory, or deleting it.
    fn discard(&mut self, path: &Path, name: &str) -> FileOutcome {
        let backup_target = self.ctx.backup_path_for(name);
        let backed_up = backup_target.is_some();
        match backup_target {
            Some(target) => self.transaction.move_to_backup(path, target),
            None => self.transaction.delete(path),
        }

        self.files.push(FileReport {
            name: name.to_string(),
            outcome: FileOutcome::Discarded,
            is_origin: true,
            backed_up,
        });
        FileOutcome::Discarded
    }

    fn record(&mut self, bundle: &BundleFile, outcome: FileOutcome, backed_up: bool) -> FileOutcome {
        self.files.push(FileReport {
            name: bundle.name.clone(),
            outcome,
            is_origin: bundle.is_origin,
            backed_up,
        });
        outcome
    }

    /// Report unused patterns and commit (or, for dry runs, discard) the plan.
    pub fn finish(self, diagnostics: &mut Diagnostics) -> Result<RunSummary> {
        self.whitelist.report_unused(&self.used, diagnostics);
        self.interrupt.check()?;

        let operations = self
            .transaction
            .operations()
            .iter()
            .map(ToString::to_string)
            .collect();
        let applied = self.transaction.commit()?;

        Ok(RunSummary {
            files: self.files,
            operations,
            applied,
        })
    }
}

/// Final path component as a display string.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Bundle files in the trust directory, sorted by name.
///
/// Only regular files are considered; hidden files (including our own
/// temporary files) and subdirectories such as the backup directory are
/// skipped.
pub fn list_bundle_files(ctx: &TrustContext) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(&ctx.trust_dir).map_err(|e| {
        TrustError::ConfigError(format!(
            "failed to read trust directory '{}': {}",
            ctx.trust_dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            TrustError::ConfigError(format!(
                "failed to read trust directory '{}': {}",
                ctx.trust_dir.display(),
                e
            ))
        })?;
        let path = entry.path();

        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if !path.is_file() {
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Filter every bundle in the trust directory against `whitelist`.
///
/// Processing is sequential in file-name order. Any error before the commit
/// phase, including a raised `interrupt`, leaves the directory exactly as
/// it was.
pub fn rewrite_trust_dir(
    ctx: &TrustContext,
    whitelist: &Whitelist,
    skip: Option<&Regex>,
    dry_run: bool,
    interrupt: &Interrupt,
    diagnostics: &mut Diagnostics,
) -> Result<RunSummary> {
    ctx.ensure_trust_dir()?;
    let files = list_bundle_files(ctx)?;

    let mut rewriter =
        Rewriter::new(ctx, whitelist, skip, dry_run).with_interrupt(interrupt.clone());
    for path in &files {
        rewriter.process_path(path, diagnostics)?;
    }

    rewriter.finish(diagnostics)
}
