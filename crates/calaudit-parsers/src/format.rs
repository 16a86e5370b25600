//! Input format detection.
//!
//! The format is an explicit closed variant resolved once at parse entry and
//! never re-inferred downstream. Detection runs extension first, then content
//! signature, then CSV header scoring against the two known vendor schemas.

use serde::{Deserialize, Serialize};

/// The resolved input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// CSV with the Outlook export column schema.
    OutlookCsv,
    /// CSV with the Google Calendar export column schema.
    GoogleCsv,
    /// iCalendar (RFC 5545) text.
    Ics,
}

impl Format {
    /// Returns a short name for display and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutlookCsv => "outlook",
            Self::GoogleCsv => "google",
            Self::Ics => "ics",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller-supplied override for CSV template sniffing.
///
/// Ignored for ICS input; detection between CSV and ICS is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOverride {
    Outlook,
    Google,
}

impl SourceOverride {
    /// The CSV format this override selects.
    pub fn format(&self) -> Format {
        match self {
            Self::Outlook => Format::OutlookCsv,
            Self::Google => Format::GoogleCsv,
        }
    }
}

/// The coarse file kind, before CSV template sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Ics,
}

/// Header columns that only the Outlook export schema carries.
const OUTLOOK_SIGNATURE: [&str; 3] = ["Organizer", "Required Attendees", "Meeting Organizer"];

/// Header columns that only the Google export schema carries.
const GOOGLE_SIGNATURE: [&str; 2] = ["Description", "Private"];

/// Detects whether the input is CSV or ICS.
///
/// Extension wins when present; otherwise the iCalendar object header is the
/// signature. Anything else is treated as CSV and left to header scoring,
/// which reports `UnrecognizedFormat` when no template matches.
pub fn detect_file_kind(text: &str, filename: &str) -> FileKind {
    let lower = filename.to_lowercase();
    if lower.ends_with(".ics") {
        return FileKind::Ics;
    }
    if lower.ends_with(".csv") {
        return FileKind::Csv;
    }
    if text.trim_start().starts_with("BEGIN:VCALENDAR") {
        return FileKind::Ics;
    }
    FileKind::Csv
}

/// Scores a CSV header row against the two vendor schemas.
///
/// Returns `None` when neither template matches.
pub fn detect_csv_template(headers: &[String]) -> Option<Format> {
    let trimmed: Vec<&str> = headers.iter().map(|h| h.trim()).collect();

    let outlook_matches = OUTLOOK_SIGNATURE
        .iter()
        .filter(|c| trimmed.contains(*c))
        .count();
    let google_matches = GOOGLE_SIGNATURE
        .iter()
        .filter(|c| trimmed.contains(*c))
        .count();

    if outlook_matches > google_matches {
        Some(Format::OutlookCsv)
    } else if google_matches > outlook_matches {
        Some(Format::GoogleCsv)
    } else if trimmed.contains(&"Subject") && trimmed.contains(&"Start Date") {
        Some(Format::GoogleCsv)
    } else {
        None
    }
}
