//! In-memory model of p11-kit trust-source bundles.
//!
//! A bundle is an ini-like file of `[kind]` sections, each carrying
//! `key: value` properties and an optional PEM block. Parsing builds a
//! [`LabelMap`] keyed by each object's `label` property; serializing writes
//! the same grammar back out deterministically.

mod parser;
mod serialize;


pub use parser::{parse, parse_bytes};
pub use serialize::{serialize, to_bytes};

use indexmap::IndexMap;

/// Label -> objects carrying that label, in encounter order.
pub type LabelMap = IndexMap<String, Vec<ConfigObject>>;

/// Property name that identifies an object for whitelist matching.
pub const LABEL_KEY: &str = "label";

/// One parsed section of a bundle file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigObject {
    /// The bracketed header tag, e.g. `p11-kit-object-v1`.
    pub section_kind: String,
    /// Properties in source order. The first occurrence of a key wins.
    pub properties: IndexMap<String, String>,
    /// PEM payload including the BEGIN/END delimiter lines.
    pub pem_block: Option<String>,
    /// `<file>:<line>` of the section header, for display only.
    pub source_name: String,
}

impl ConfigObject {
    pub fn new(section_kind: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            section_kind: section_kind.into(),
            properties: IndexMap::new(),
            pem_block: None,
            source_name: source_name.into(),
        }
    }

    /// The object's label with surrounding quotes removed, if non-empty.
    pub fn label(&self) -> Option<&str> {
        self.properties
            .get(LABEL_KEY)
            .map(|value| unquote(value))
            .filter(|label| !label.is_empty())
    }

    /// The PEM type from the BEGIN line, e.g. `CERTIFICATE`.
    pub fn pem_tag(&self) -> Option<&str> {
        let first = self.pem_block.as_deref()?.lines().next()?;
        first
            .strip_prefix("-----BEGIN ")?
            .trim_end()
            .strip_suffix("-----")
    }
}

/// Strip whitespace and one layer of surrounding quote characters.
pub fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Number of objects across all labels.
pub fn object_count(map: &LabelMap) -> usize {
    map.values().map(Vec::len).sum()
}
