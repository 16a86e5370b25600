//! Parse error taxonomy and warnings.
//!
//! Only format-level and total-failure conditions surface as [`ParseError`].
//! Item-level problems (a malformed row, a coerced duration, a capped
//! recurrence expansion) are recovered locally and collected as
//! [`ParseWarning`]s so one bad row never sinks the whole analysis.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort an analysis.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file matches neither CSV template and is not valid iCalendar text.
    #[error("unrecognized calendar format: {0}")]
    UnrecognizedFormat(String),

    /// The format was recognized but no usable records survived.
    #[error("no valid records found: {0}")]
    NoValidRecords(String),

    /// The input could not be read.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// The category of a non-fatal parse problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A CSV row could not be mapped to a record.
    MalformedRow,
    /// An ICS component could not be mapped to a record.
    MalformedComponent,
    /// `end < start`; the duration was coerced to zero.
    CoercedDuration,
    /// Recurrence expansion hit the instance cap.
    ExpansionCapped,
    /// The caller's source override disagreed with auto-detection.
    OverrideMismatch,
    /// A cancelled event was dropped.
    DroppedCancelled,
}

impl WarningKind {
    /// Returns a short machine-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedRow => "malformed_row",
            Self::MalformedComponent => "malformed_component",
            Self::CoercedDuration => "coerced_duration",
            Self::ExpansionCapped => "expansion_capped",
            Self::OverrideMismatch => "override_mismatch",
            Self::DroppedCancelled => "dropped_cancelled",
        }
    }
}

/// A non-fatal problem encountered while parsing one row or component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// The category of the problem.
    pub kind: WarningKind,
    /// Where it happened: a row number or a component UID.
    pub location: String,
    /// What happened, in human-readable form.
    pub reason: String,
}

impl ParseWarning {
    /// Creates a new warning.
    pub fn new(kind: WarningKind, location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind.as_str(), self.location, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::UnrecognizedFormat("no matching header template".to_string());
        assert!(err.to_string().contains("unrecognized calendar format"));

        let err = ParseError::NoValidRecords("all rows skipped".to_string());
        assert!(err.to_string().contains("no valid records"));
    }

    #[test]
    fn warning_display_names_location() {
        let warning = ParseWarning::new(WarningKind::MalformedRow, "row 5", "missing start time");
        let text = warning.to_string();
        assert!(text.contains("malformed_row"));
        assert!(text.contains("row 5"));
        assert!(text.contains("missing start time"));
    }

    #[test]
    fn warning_serde_roundtrip() {
        let warning = ParseWarning::new(WarningKind::ExpansionCapped, "uid-1", "capped at 500");
        let json = serde_json::to_string(&warning).unwrap();
        let parsed: ParseWarning = serde_json::from_str(&json).unwrap();
        assert_eq!(warning, parsed);
    }
}
