//! Non-fatal load diagnostics

use serde::{Serialize, Serializer};
use std::fmt;

/// What kind of irregularity a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A section or field name seen twice; the later one wins
    DuplicateKey,
    /// A line that is neither comment, header, nor `key=value`
    UnparsedLine,
    /// A key outside the schema, kept verbatim but otherwise ignored
    UnrecognizedFlag,
    /// A `key==value` line; one leading `=` was stripped from the value
    MalformedBooleanLeadingEquals,
    /// A value that does not parse as its field's declared type
    TypeCoercionFailure,
    /// A record that could not be built into an item
    InvalidItemDefinition,
    /// A type-specific field on an item type that has no use for it
    IrrelevantField,
    /// A descriptive field was absent; the item was built with an empty value
    MissingField,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::DuplicateKey => "duplicate key",
            DiagnosticKind::UnparsedLine => "unparsed line",
            DiagnosticKind::UnrecognizedFlag => "unrecognized flag",
            DiagnosticKind::MalformedBooleanLeadingEquals => "leading '=' in value",
            DiagnosticKind::TypeCoercionFailure => "type coercion failure",
            DiagnosticKind::InvalidItemDefinition => "invalid item definition",
            DiagnosticKind::IrrelevantField => "irrelevant field",
            DiagnosticKind::MissingField => "missing field",
        };
        write!(f, "{}", s)
    }
}

/// Where a diagnostic was raised
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Lines that do not belong to any valid section
    Preamble,
    /// Inside the named section
    Record(String),
}

impl Location {
    pub fn record(key: &str) -> Self {
        Location::Record(key.to_string())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Preamble => write!(f, "preamble"),
            Location::Record(key) => write!(f, "{}", key),
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single collected irregularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub location: Location,
    /// 1-based source line
    pub line: usize,
    /// Field name, or empty when the diagnostic concerns a whole line or section
    pub field: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        location: Location,
        line: usize,
        field: &str,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location,
            line,
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} [{}]", self.line, self.location)?;
        if !self.field.is_empty() {
            write!(f, " {}", self.field)?;
        }
        write!(f, ": {} ({})", self.message, self.kind)
    }
}
