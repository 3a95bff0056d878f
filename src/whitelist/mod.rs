//! Whitelist loading and label filtering.
//!
//! A whitelist is an ordered list of shell-glob patterns (`*`, `?`, `[...]`),
//! matched case-sensitively against object labels. A label is kept when any
//! pattern matches; the first matching pattern in list order is credited as
//! "used" so patterns that never match anything can be reported.
//! Matching follows fnmatch: braces and backslashes are ordinary characters
//! and `*` also matches `/`.
//!
//! Whitelist file syntax: one pattern per line, `#` starts a comment when it
//! is at the start of a line or preceded by whitespace, blank lines skipped.

#[cfg(test)]
mod tests;

use crate::bundle::LabelMap;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TrustError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)#.*$").expect("Invalid whitelist comment regex"));

/// Indices of whitelist patterns that matched at least one label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedPatterns(BTreeSet<usize>);

impl UsedPatterns {
    pub fn mark(&mut self, index: usize) {
        self.0.insert(index);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Merge usage from another filter pass.
    pub fn extend(&mut self, other: &UsedPatterns) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compiled whitelist patterns.
pub struct Whitelist {
    patterns: Vec<String>,
    globs: GlobSet,
}

impl std::fmt::Debug for Whitelist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Whitelist")
            .field("patterns", &self.patterns)
            .finish()
    }
}

impl Whitelist {
    /// Read and compile a whitelist file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            TrustError::ConfigError(format!(
                "failed to read whitelist '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&content)
    }

    /// Parse whitelist text, stripping comments and blank lines.
    pub fn parse(content: &str) -> Result<Self> {
        let patterns = content
            .lines()
            .map(|line| COMMENT_RE.replace(line, "").trim().to_string())
            .filter(|line| !line.is_empty());

        Self::from_patterns(patterns)
    }

    /// Compile patterns given directly, in priority order.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();

        for pattern in &patterns {
            let glob = GlobBuilder::new(&shell_glob(pattern))
                .backslash_escape(false)
                .build()
                .map_err(|e| {
                    TrustError::ConfigError(format!(
                        "invalid whitelist pattern '{}' - {}",
                        pattern, e
                    ))
                })?;
            builder.add(glob);
        }

        let globs = builder.build().map_err(|e| {
            TrustError::ConfigError(format!("failed to compile whitelist patterns: {}", e))
        })?;

        Ok(Self { patterns, globs })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Index of the first pattern (in list order) matching `label`.
    pub fn first_match(&self, label: &str) -> Option<usize> {
        self.globs.matches(label).into_iter().min()
    }

    /// Keep only labels matched by some pattern.
    ///
    /// Returns a new map in the input's order; the input is not modified.
    pub fn filter(&self, map: &LabelMap) -> (LabelMap, UsedPatterns) {
        let mut filtered = LabelMap::new();
        let mut used = UsedPatterns::default();

        for (label, objects) in map {
            if let Some(index) = self.first_match(label) {
                used.mark(index);
                filtered.insert(label.clone(), objects.clone());
            }
        }

        (filtered, used)
    }

    /// Patterns that never matched during the run.
    pub fn unused<'a>(&'a self, used: &UsedPatterns) -> Vec<&'a str> {
        self.patterns
            .iter()
            .enumerate()
            .filter(|(index, _)| !used.contains(*index))
            .map(|(_, pattern)| pattern.as_str())
            .collect()
    }

    /// Emit one warning per pattern that never matched.
    pub fn report_unused(&self, used: &UsedPatterns, diagnostics: &mut Diagnostics) {
        for pattern in self.unused(used) {
            diagnostics.warning(format!(
                "whitelist pattern '{}' did not match any label",
                pattern
            ));
        }
    }
}

/// Rewrite an fnmatch-style pattern into globset syntax.
///
/// Only `*`, `?` and `[...]` are special. Braces, a `]` outside a class and
/// a `[` without a closing `]` are matched literally. Runs of `*` collapse
/// to one so globset never sees `**`.
fn shell_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            ']' => out.push_str("[]]"),
            c => out.push(c),
        }
        i += 1;
    }

    out
}

/// Index of the `]` closing the class opened at `start`, if any.
///
/// A `]` right after `[` or `[!` is part of the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if matches!(chars.get(i), Some('!') | Some('^')) {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    chars[i.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| i + offset)
}
