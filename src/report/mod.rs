//! Listing output for `--list`, `--list-all`, and `--print`.
//!
//! Per-file label maps are merged with [`aggregate`], turned into numbered
//! [`LabelReport`]s by [`build_report`], and rendered as text or JSON.
//! Certificate details come from an optional [`CertificateInspector`] and
//! never affect filtering.

mod inspect;


pub use inspect::{CertificateInfo, CertificateInspector, default_inspector};

#[cfg(feature = "x509")]
pub use inspect::X509Inspector;

use crate::bundle::LabelMap;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TrustError};
use serde::Serialize;
use std::fmt::Write as _;

/// One numbered label in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelReport {
    /// 1-based position in the listing.
    pub index: usize,
    pub label: String,
    pub objects: Vec<ObjectReport>,
}

/// One object carrying a listed label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectReport {
    /// `<file>:<line>` the object was parsed from.
    pub source: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateInfo>,
}

/// Union per-file maps into one, appending objects of repeated labels.
///
/// Labels keep the order in which they were first seen.
pub fn aggregate<I>(maps: I) -> LabelMap
where
    I: IntoIterator<Item = LabelMap>,
{
    let mut combined = LabelMap::new();
    for map in maps {
        for (label, objects) in map {
            combined.entry(label).or_default().extend(objects);
        }
    }
    combined
}

/// Number the labels of `map` and, if an inspector is given, attach
/// certificate details to every object holding a `CERTIFICATE` PEM block.
///
/// Objects the inspector cannot read are listed without details and
/// reported as errors.
pub fn build_report(
    map: &LabelMap,
    inspector: Option<&dyn CertificateInspector>,
    diagnostics: &mut Diagnostics,
) -> Vec<LabelReport> {
    let mut report = Vec::with_capacity(map.len());

    for (position, (label, objects)) in map.iter().enumerate() {
        let mut entries = Vec::with_capacity(objects.len());

        for object in objects {
            let mut certificate = None;
            if let (Some(inspector), Some(pem_block)) = (inspector, object.pem_block.as_deref())
                && object.pem_tag() == Some("CERTIFICATE")
            {
                match inspector.inspect(pem_block) {
                    Ok(info) => certificate = Some(info),
                    Err(e) => diagnostics.error(
                        object.source_name.clone(),
                        format!("cannot inspect certificate: {:#}", e),
                    ),
                }
            }

            entries.push(ObjectReport {
                source: object.source_name.clone(),
                kind: object.section_kind.clone(),
                certificate,
            });
        }

        report.push(LabelReport {
            index: position + 1,
            label: label.clone(),
            objects: entries,
        });
    }

    report
}

/// Human-readable listing.
///
/// Each label gets one numbered line. Sources are shown only for labels
/// carried by more than one object; certificate details are indented below
/// the object they belong to.
pub fn render_text(report: &[LabelReport]) -> String {
    let mut out = String::new();

    for entry in report {
        let _ = writeln!(out, "{:>4}. {}", entry.index, entry.label);

        let attributed = entry.objects.len() > 1;
        for object in &entry.objects {
            let indent = if attributed {
                let _ = writeln!(out, "      from {}", object.source);
                "        "
            } else {
                "      "
            };

            if let Some(info) = &object.certificate {
                for (algorithm, fingerprint) in &info.fingerprints {
                    let _ = writeln!(out, "{}{}: {}", indent, algorithm, fingerprint);
                }
                for (name, value) in &info.attributes {
                    let _ = writeln!(out, "{}{}={}", indent, name, value);
                }
            }
        }
    }

    out
}

/// The listing as a pretty-printed JSON array.
pub fn render_json(report: &[LabelReport]) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| TrustError::IoError(format!("failed to render JSON listing: {}", e)))
}
