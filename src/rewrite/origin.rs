//! Generated-file header and origin detection.
//!
//! Every file we write starts with
//!
//! ```text
//! ## Generated by trustfilter from <name> [<tag>]
//! ```
//!
//! where `<tag>` is [`short_hash`] of every byte after that line. A file whose
//! first line matches and whose tag verifies is our own output; anything
//! else is an origin file, including hand-edited output.

use crate::bundle::{self, LabelMap};
use crate::tagger::{TAG_LENGTH, short_hash};
use regex::Regex;
use std::sync::LazyLock;

/// Name written into generated headers.
pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## Generated by \S+ from .+ \[([A-Za-z0-9]+)\]\s*$")
        .expect("Invalid generated header regex")
});

/// Result of inspecting a file's first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin<'a> {
    /// True unless the content is verified output of a previous run.
    pub is_origin: bool,
    /// Content to parse: everything after a verified header, else all of it.
    pub body: &'a [u8],
}

/// Decide whether `content` is pristine or previously generated.
pub fn detect_origin(content: &[u8]) -> Origin<'_> {
    let pristine = Origin {
        is_origin: true,
        body: content,
    };

    let Some(newline) = content.iter().position(|&b| b == b'\n') else {
        return pristine;
    };
    let Ok(first_line) = std::str::from_utf8(&content[..newline]) else {
        return pristine;
    };
    let Some(caps) = HEADER_RE.captures(first_line) else {
        return pristine;
    };

    let body = &content[newline + 1..];
    let tag = &caps[1];
    if tag.len() == TAG_LENGTH && short_hash(body, TAG_LENGTH) == tag {
        Origin {
            is_origin: false,
            body,
        }
    } else {
        pristine
    }
}

/// The header line (without newline) for a generated file.
pub fn header_line(original_name: &str, tag: &str) -> String {
    format!("## Generated by {} from {} [{}]", TOOL_NAME, original_name, tag)
}

/// Full content of a generated file: header line followed by the serialized map.
///
/// The body is rendered to memory first so the tag can be computed before
/// anything is written.
pub fn render_generated(original_name: &str, map: &LabelMap) -> Vec<u8> {
    let body = bundle::to_bytes(map);
    let tag = short_hash(&body, TAG_LENGTH);

    let mut content = header_line(original_name, &tag).into_bytes();
    content.push(b'\n');
    content.extend_from_slice(&body);
    content
}
