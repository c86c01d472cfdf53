//! Line-level INI parsing and serialization primitives.
//!
//! Responsibilities:
//! - Parse INI text into an ordered section map with override-on-merge
//!   semantics (later input wins for the same section/option).
//! - Serialize a section map (plus optional defaults) back to INI text.
//!
//! Does NOT handle:
//! - The `#import` include directive (scanned by `store.rs` before parsing;
//!   those lines start with `#` and are skipped here as comments).
//! - Defaulting or redaction semantics (see `store.rs`).
//!
//! Invariants:
//! - Section and option names are case-sensitive and trimmed.
//! - `key = value` and `key: value` are both accepted; the first delimiter
//!   found splits the line.
//! - Full-line comments start with `#` or `;`. There are no inline comments.

use std::collections::BTreeMap;
use std::io::Write;

/// Ordered mapping of section name to option name to string value.
pub(crate) type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// A parse failure with its one-based line number, wrapped into
/// `ConfigError::Parse` or `ConfigError::ParseStream` by callers that know
/// the input source.
#[derive(Debug)]
pub(crate) struct ParseFailure {
    pub line: usize,
    pub message: String,
}

/// Parse INI text into `sections`, overriding any values already present.
pub(crate) fn merge_str(sections: &mut Sections, text: &str) -> Result<(), ParseFailure> {
    let mut current: Option<String> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(inner) = line.strip_prefix('[') {
            let Some(name) = inner.strip_suffix(']') else {
                return Err(ParseFailure {
                    line: index + 1,
                    message: format!("unterminated section header: {line}"),
                });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ParseFailure {
                    line: index + 1,
                    message: "empty section name".to_string(),
                });
            }
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        let Some(delim) = line.find(|c| c == '=' || c == ':') else {
            return Err(ParseFailure {
                line: index + 1,
                message: format!("expected 'option = value', got: {line}"),
            });
        };
        let option = line[..delim].trim();
        let value = line[delim + 1..].trim();
        if option.is_empty() {
            return Err(ParseFailure {
                line: index + 1,
                message: "empty option name".to_string(),
            });
        }

        let Some(section) = &current else {
            return Err(ParseFailure {
                line: index + 1,
                message: format!("option before any section header: {line}"),
            });
        };
        sections
            .entry(section.clone())
            .or_default()
            .insert(option.to_string(), value.to_string());
    }

    Ok(())
}

/// Serialize defaults and sections to INI text.
///
/// Defaults, when present, are written first under a `[DEFAULT]` header.
/// Every block is followed by a blank line so concatenated output stays
/// parseable.
pub(crate) fn write_sections(
    w: &mut dyn Write,
    defaults: &BTreeMap<String, String>,
    sections: &Sections,
) -> std::io::Result<()> {
    if !defaults.is_empty() {
        writeln!(w, "[DEFAULT]")?;
        for (option, value) in defaults {
            writeln!(w, "{option} = {value}")?;
        }
        writeln!(w)?;
    }

    for (section, options) in sections {
        writeln!(w, "[{section}]")?;
        for (option, value) in options {
            writeln!(w, "{option} = {value}")?;
        }
        writeln!(w)?;
    }

    Ok(())
}
