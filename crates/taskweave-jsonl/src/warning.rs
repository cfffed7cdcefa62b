//! Non-fatal problems found while reading JSONL data.
//!
//! Resilient reading keeps going past bad lines. Each skipped line becomes a
//! [`Warning`] so callers can report data-quality problems without refusing
//! to load the rest of the file.

use serde_json::error::Category;
use std::fmt;

/// Why a line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// Not valid JSON, or cut off mid-record.
    Syntax,

    /// Valid JSON that does not decode into the record type.
    Shape,

    /// Bytes that are not UTF-8.
    Encoding,
}

impl WarningKind {
    /// Stable lowercase name, for logs and JSON output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Shape => "shape",
            Self::Encoding => "encoding",
        }
    }
}

/// A line that was skipped during resilient reading.
///
/// ```
/// use taskweave_jsonl::{Warning, WarningKind};
///
/// let warning = Warning {
///     line: 42,
///     kind: WarningKind::Syntax,
///     message: "EOF while parsing an object".to_string(),
/// };
/// assert_eq!(warning.to_string(), "line 42: invalid JSON: EOF while parsing an object");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// 1-based line number, counting blank lines.
    pub line: usize,

    /// Classification of the failure.
    pub kind: WarningKind,

    /// Decoder message.
    pub message: String,
}

impl Warning {
    pub(crate) fn from_decode_error(line: usize, err: &serde_json::Error) -> Self {
        let kind = match err.classify() {
            Category::Data => WarningKind::Shape,
            Category::Syntax | Category::Eof | Category::Io => WarningKind::Syntax,
        };
        Self {
            line,
            kind,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_utf8(line: usize, err: &std::str::Utf8Error) -> Self {
        Self {
            line,
            kind: WarningKind::Encoding,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::Syntax => "invalid JSON",
            WarningKind::Shape => "unexpected record shape",
            WarningKind::Encoding => "invalid UTF-8",
        };
        write!(f, "line {}: {what}: {}", self.line, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Record {
        id: u32,
    }

    #[test]
    fn truncated_record_is_syntax() {
        let err = serde_json::from_str::<Record>("{\"id\": ").unwrap_err();
        let warning = Warning::from_decode_error(3, &err);
        assert_eq!(warning.kind, WarningKind::Syntax);
        assert_eq!(warning.line, 3);
    }

    #[test]
    fn missing_field_is_shape() {
        let err = serde_json::from_str::<Record>("{\"name\": \"x\"}").unwrap_err();
        let warning = Warning::from_decode_error(7, &err);
        assert_eq!(warning.kind.as_str(), "shape");
        assert!(warning.to_string().starts_with("line 7: unexpected record shape"));
    }
}
