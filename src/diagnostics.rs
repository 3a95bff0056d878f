//! Recoverable diagnostics.
//!
//! Parse problems (missing label, missing PEM block, duplicate property,
//! unrecognized line) and unused whitelist patterns are collected here
//! instead of aborting the run. The CLI prints them to stderr as
//! `ERROR: ...` and `WARNING: ...` lines.

use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A line or object was dropped.
    Error,
    /// Something looks off but nothing was dropped.
    Warning,
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Where the problem was found, usually `<file>:<line>`. Empty for run-wide messages.
    pub context: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        if self.context.is_empty() {
            write!(f, "{}: {}", prefix, self.message)
        } else {
            write!(f, "{}: {}: {}", prefix, self.context, self.message)
        }
    }
}

/// Append-only diagnostic sink shared across a run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            context: String::new(),
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count diagnostics of one severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Print collected diagnostics to stderr and clear the sink.
    ///
    /// Warnings are suppressed when `quiet` is set; errors never are.
    pub fn flush(&mut self, quiet: bool) {
        for diagnostic in self.entries.drain(..) {
            if quiet && diagnostic.severity == Severity::Warning {
                continue;
            }
            eprintln!("{}", diagnostic);
        }
    }
}
