//! Deterministic rendering of a label map back into bundle syntax.
//!
//! Identical maps always produce identical bytes. Origin detection depends on
//! this: a re-run over our own output must hash to the same tag.

use super::LabelMap;
use std::io::{self, Write};

/// Write every object in map order, separated by one blank line.
pub fn serialize<W: Write>(map: &LabelMap, out: &mut W) -> io::Result<()> {
    let mut first = true;

    for object in map.values().flatten() {
        if !first {
            writeln!(out)?;
        }
        first = false;

        writeln!(out, "[{}]", object.section_kind)?;
        for (key, value) in &object.properties {
            writeln!(out, "{}: {}", key, value)?;
        }
        if let Some(pem) = &object.pem_block {
            writeln!(out, "{}", pem.trim_end())?;
        }
    }

    Ok(())
}

/// Serialize into an in-memory buffer.
pub fn to_bytes(map: &LabelMap) -> Vec<u8> {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = serialize(map, &mut buffer);
    buffer
}
