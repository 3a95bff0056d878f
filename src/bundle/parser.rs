//! Line-oriented bundle parser.
//!
//! A single pass over the input drives a four-state machine:
//! outside any section, reading section properties, a PEM block just opened,
//! and inside a PEM body. Malformed input never fails the parse; every
//! problem becomes a diagnostic and the offending line or object is skipped.

use super::{ConfigObject, LabelMap};
use crate::diagnostics::Diagnostics;
use regex::Regex;
use std::iter;
use std::sync::LazyLock;

/// Appended after the real input so the last open section gets finalized.
const END_MARKER: &str = "[end]";

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[\s*([^\[\]\s]+)\s*\]\s*$").expect("Invalid section regex"));

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*):\s+(\S.*?)\s*$").expect("Invalid property regex")
});

static PEM_BEGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-----BEGIN ([A-Z0-9][A-Z0-9 ]*)-----\s*$").expect("Invalid PEM begin regex")
});

static PEM_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-----END ([A-Z0-9][A-Z0-9 ]*)-----\s*$").expect("Invalid PEM end regex")
});

static PEM_BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/=]+\s*$").expect("Invalid PEM body regex"));

#[derive(Debug, PartialEq, Eq)]
enum State {
    OutsideSection,
    Properties,
    /// BEGIN seen, no body line yet.
    PemOpen { tag: String },
    PemBody { tag: String },
}

/// A section being accumulated.
struct OpenSection {
    object: ConfigObject,
    pem_lines: Vec<String>,
    /// Set while consuming a second PEM block that will be thrown away.
    discard_pem: bool,
}

struct Parser<'d> {
    context: &'d str,
    state: State,
    section: Option<OpenSection>,
    map: LabelMap,
    diagnostics: &'d mut Diagnostics,
}

/// Parse bundle lines into a label map.
///
/// `context` names the input (usually the file name) in diagnostics and in
/// each object's `source_name`.
pub fn parse<'a, I>(lines: I, context: &str, diagnostics: &mut Diagnostics) -> LabelMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = Parser {
        context,
        state: State::OutsideSection,
        section: None,
        map: LabelMap::new(),
        diagnostics,
    };

    for (index, line) in lines.into_iter().chain(iter::once(END_MARKER)).enumerate() {
        parser.feed(index + 1, line);
    }

    parser.map
}

/// Parse raw file content. Invalid UTF-8 is replaced rather than rejected.
pub fn parse_bytes(content: &[u8], context: &str, diagnostics: &mut Diagnostics) -> LabelMap {
    let text = String::from_utf8_lossy(content);
    parse(text.lines(), context, diagnostics)
}

impl Parser<'_> {
    fn location(&self, line_no: usize) -> String {
        format!("{}:{}", self.context, line_no)
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }

        if let Some(caps) = SECTION_RE.captures(line) {
            self.finalize();
            self.section = Some(OpenSection {
                object: ConfigObject::new(&caps[1], self.location(line_no)),
                pem_lines: Vec::new(),
                discard_pem: false,
            });
            self.state = State::Properties;
            return;
        }

        match std::mem::replace(&mut self.state, State::OutsideSection) {
            State::OutsideSection => {
                self.unrecognized(line_no, line);
            }
            State::Properties => {
                self.state = State::Properties;
                self.feed_property(line_no, line);
            }
            State::PemOpen { tag } => {
                if PEM_BODY_RE.is_match(line) {
                    self.push_pem_line(line);
                    self.state = State::PemBody { tag };
                } else {
                    self.state = State::PemOpen { tag };
                    self.unrecognized(line_no, line);
                }
            }
            State::PemBody { tag } => {
                if PEM_BODY_RE.is_match(line) {
                    self.push_pem_line(line);
                    self.state = State::PemBody { tag };
                } else if PEM_END_RE
                    .captures(line)
                    .is_some_and(|caps| caps[1] == *tag)
                {
                    self.push_pem_line(line);
                    self.close_pem();
                    self.state = State::Properties;
                } else {
                    self.state = State::PemBody { tag };
                    self.unrecognized(line_no, line);
                }
            }
        }
    }

    fn feed_property(&mut self, line_no: usize, line: &str) {
        if let Some(caps) = PEM_BEGIN_RE.captures(line) {
            let location = self.location(line_no);
            let Some(section) = self.section.as_mut() else {
                return;
            };
            if section.object.pem_block.is_some() {
                self.diagnostics
                    .error(location, "duplicate PEM block ignored, keeping the first");
                section.discard_pem = true;
            }
            section.pem_lines.clear();
            section.pem_lines.push(line.trim_end().to_string());
            self.state = State::PemOpen {
                tag: caps[1].to_string(),
            };
            return;
        }

        if let Some(caps) = PROPERTY_RE.captures(line) {
            let location = self.location(line_no);
            let Some(section) = self.section.as_mut() else {
                return;
            };
            let key = &caps[1];
            if section.object.properties.contains_key(key) {
                self.diagnostics.error(
                    location,
                    format!("duplicate property '{}' ignored, keeping the first", key),
                );
            } else {
                section
                    .object
                    .properties
                    .insert(key.to_string(), caps[2].to_string());
            }
            return;
        }

        self.unrecognized(line_no, line);
    }

    fn push_pem_line(&mut self, line: &str) {
        if let Some(section) = self.section.as_mut() {
            section.pem_lines.push(line.trim_end().to_string());
        }
    }

    fn close_pem(&mut self) {
        if let Some(section) = self.section.as_mut() {
            let lines = std::mem::take(&mut section.pem_lines);
            if section.discard_pem {
                section.discard_pem = false;
            } else {
                section.object.pem_block = Some(lines.join("\n"));
            }
        }
    }

    fn unrecognized(&mut self, line_no: usize, line: &str) {
        let location = self.location(line_no);
        self.diagnostics
            .error(location, format!("unrecognized line ignored: {}", line.trim()));
    }

    /// Validate the open section and move it into the map, or drop it.
    fn finalize(&mut self) {
        let Some(section) = self.section.take() else {
            return;
        };
        let state = std::mem::replace(&mut self.state, State::OutsideSection);
        let object = section.object;
        let location = object.source_name.clone();

        if matches!(state, State::PemOpen { .. } | State::PemBody { .. }) {
            self.diagnostics
                .error(location, "unterminated PEM block, object dropped");
            return;
        }

        let Some(label) = object.label().map(str::to_string) else {
            self.diagnostics
                .error(location, "object has no label, object dropped");
            return;
        };

        if object.pem_block.is_none() {
            self.diagnostics.error(
                location,
                format!("object '{}' has no PEM block, object dropped", label),
            );
            return;
        }

        self.map.entry(label).or_default().push(object);
    }
}
