//! Block-format catalog parser
//!
//! Text is a sequence of `[Section]` headers, each followed by `key=value`
//! lines. `#` comments and blank lines are skipped. Every irregularity
//! becomes a [`Diagnostic`]; nothing in the text aborts a parse.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use super::diagnostics::{Diagnostic, DiagnosticKind, Location};
use super::schema::{coerce, field_type, suggest_flag, FieldValue};
use crate::config::LoaderOptions;

/// Section header: `[Identifier]` with letters, digits and underscores
static SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([A-Za-z0-9_]+)\]$").unwrap());

/// A schema field after coercion
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub value: FieldValue,
    /// 1-based line the value came from
    pub line: usize,
}

/// One section's fields, before item validation
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub key: String,
    /// Line of the `[key]` header
    pub line: usize,
    /// Schema fields in the order first assigned
    pub fields: IndexMap<String, RawField>,
    /// Keys outside the schema, verbatim
    pub unrecognized: IndexMap<String, String>,
}

impl RawRecord {
    fn new(key: &str, line: usize) -> Self {
        Self {
            key: key.to_string(),
            line,
            fields: IndexMap::new(),
            unrecognized: IndexMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field).map(|f| &f.value)
    }

    pub fn line_of(&self, field: &str) -> usize {
        self.fields.get(field).map_or(self.line, |f| f.line)
    }
}

/// Parser output: records keyed by section name, plus diagnostics in line order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCatalog {
    pub records: IndexMap<String, RawRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse catalog text into raw records
pub fn parse_catalog(text: &str, options: &LoaderOptions) -> ParsedCatalog {
    let mut parser = Parser {
        options,
        out: ParsedCatalog::default(),
        current: None,
    };

    // A UTF-8 byte-order mark is not part of the first line
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    for (idx, raw_line) in text.lines().enumerate() {
        parser.line(idx + 1, raw_line);
    }
    parser.finish_record();

    debug!(
        "Parsed {} records with {} diagnostics",
        parser.out.records.len(),
        parser.out.diagnostics.len()
    );
    parser.out
}

struct Parser<'a> {
    options: &'a LoaderOptions,
    out: ParsedCatalog,
    /// `None` while in the preamble (before the first valid header,
    /// or after an invalid one)
    current: Option<RawRecord>,
}

impl Parser<'_> {
    fn location(&self) -> Location {
        match &self.current {
            Some(record) => Location::record(&record.key),
            None => Location::Preamble,
        }
    }

    fn report(&mut self, line: usize, field: &str, kind: DiagnosticKind, message: String) {
        let diag = Diagnostic::new(self.location(), line, field, kind, message);
        debug!("{}", diag);
        self.out.diagnostics.push(diag);
    }

    fn line(&mut self, line_no: usize, raw_line: &str) {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        if line.starts_with('[') {
            self.header(line_no, line);
            return;
        }

        let Some((key, value)) = line.split_once('=') else {
            self.report(
                line_no,
                "",
                DiagnosticKind::UnparsedLine,
                format!("ignored line without '=': '{}'", line),
            );
            return;
        };

        let key = key.trim();
        let mut value = value.trim();

        if key.is_empty() {
            self.report(
                line_no,
                "",
                DiagnosticKind::UnparsedLine,
                format!("ignored line with empty key: '{}'", line),
            );
            return;
        }

        if self.current.is_none() {
            self.report(
                line_no,
                key,
                DiagnosticKind::UnparsedLine,
                "field outside of any section".to_string(),
            );
            return;
        }

        // `key==value`: keep the data, note the anomaly
        if let Some(stripped) = value.strip_prefix('=') {
            value = stripped.trim_start();
            self.report(
                line_no,
                key,
                DiagnosticKind::MalformedBooleanLeadingEquals,
                format!("stripped one leading '=' from value; read as '{}'", value),
            );
        }

        self.assign(line_no, key, value);
    }

    fn header(&mut self, line_no: usize, line: &str) {
        self.finish_record();

        let Some(name) = SECTION_REGEX.captures(line).and_then(|c| c.get(1)) else {
            self.report(
                line_no,
                "",
                DiagnosticKind::UnparsedLine,
                format!("invalid section header '{}'", line),
            );
            return;
        };
        let name = name.as_str();

        self.current = Some(RawRecord::new(name, line_no));
        if self.out.records.contains_key(name) {
            self.report(
                line_no,
                "",
                DiagnosticKind::DuplicateKey,
                format!("section '{}' defined again; the later block wins", name),
            );
        }
    }

    fn finish_record(&mut self) {
        if let Some(record) = self.current.take() {
            // IndexMap::insert keeps the first position, replaces the contents
            self.out.records.insert(record.key.clone(), record);
        }
    }

    fn assign(&mut self, line_no: usize, key: &str, value: &str) {
        let Some(ty) = field_type(key) else {
            let message = match suggest_flag(key, self.options.suggestion_distance) {
                Some(suggestion) => format!(
                    "unrecognized key '{}' ignored; did you mean '{}'?",
                    key, suggestion
                ),
                None => format!("unrecognized key '{}' ignored", key),
            };
            self.report(line_no, key, DiagnosticKind::UnrecognizedFlag, message);
            if let Some(record) = self.current.as_mut() {
                record.unrecognized.insert(key.to_string(), value.to_string());
            }
            return;
        };

        let coerced = coerce(ty, value);
        let Some(record) = self.current.as_mut() else {
            return;
        };
        let previous = match coerced {
            Ok(value) => record.fields.insert(
                key.to_string(),
                RawField {
                    value,
                    line: line_no,
                },
            ),
            // A bad value falls back to the default, even over an earlier good one
            Err(reason) => {
                let previous = record.fields.shift_remove(key);
                self.report(line_no, key, DiagnosticKind::TypeCoercionFailure, reason);
                previous
            }
        };

        if let Some(previous) = previous {
            self.report(
                line_no,
                key,
                DiagnosticKind::DuplicateKey,
                format!(
                    "field '{}' already set on line {}; the later value wins",
                    key, previous.line
                ),
            );
        }
    }
}
