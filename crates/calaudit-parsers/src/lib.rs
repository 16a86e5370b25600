//! Calendar export parsing.
//!
//! Turns raw export bytes (Outlook CSV, Google Calendar CSV, or ICS) into
//! normalized [`MeetingRecord`]s:
//!
//! 1. decode bytes (UTF-8, Windows-1252 fallback)
//! 2. resolve the [`Format`] once, from extension, content signature, and
//!    CSV header scoring
//! 3. map rows/components to raw records, expanding recurrence rules under
//!    an explicit [`ExpansionPolicy`]
//! 4. mark recurring-looking records and normalize into `MeetingRecord`s
//!
//! Item-level problems become warnings; only format-level failures and an
//! empty result propagate as [`ParseError`]s.

pub mod csv;
pub mod decode;
pub mod error;
pub mod expand;
pub mod format;
pub mod ics;
pub mod raw;

use calaudit_core::record::MeetingRecord;
use tracing::{info, warn};

pub use error::{ParseError, ParseWarning, WarningKind};
pub use expand::{Expansion, ExpansionPolicy};
pub use format::{Format, SourceOverride};
pub use raw::{RawRecord, RawTime};

/// The result of a successful parse.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// The normalized records, in source order (occurrences in rule order).
    pub records: Vec<MeetingRecord>,
    /// The format the input resolved to.
    pub format: Format,
    /// Item-level problems recovered during parsing.
    pub warnings: Vec<ParseWarning>,
    /// Number of rows/components that produced no record.
    pub skipped: usize,
}

/// Parses one calendar export.
///
/// `filename` is a hint for format detection; `source_override` replaces CSV
/// template sniffing. The parser succeeds when at least one valid record was
/// produced, otherwise fails with [`ParseError::NoValidRecords`].
pub fn parse_calendar(
    bytes: &[u8],
    filename: &str,
    source_override: Option<SourceOverride>,
    policy: &ExpansionPolicy,
) -> Result<ParseOutcome, ParseError> {
    let text = decode::decode_text(bytes);

    let outcome = match format::detect_file_kind(&text, filename) {
        format::FileKind::Ics => parse_ics_input(&text, policy)?,
        format::FileKind::Csv => parse_csv_input(&text, source_override)?,
    };

    for warning in &outcome.warnings {
        warn!(kind = warning.kind.as_str(), location = %warning.location, "{}", warning.reason);
    }
    info!(
        format = %outcome.format,
        records = outcome.records.len(),
        skipped = outcome.skipped,
        "parsed calendar export"
    );

    Ok(outcome)
}

fn parse_ics_input(text: &str, policy: &ExpansionPolicy) -> Result<ParseOutcome, ParseError> {
    let (mut raws, mut warnings, skipped) = ics::parse_ics(text, policy)?;
    raw::mark_recurring_hints(&mut raws);
    let records = raw::normalize_records(&raws, &mut warnings);
    if records.is_empty() {
        return Err(ParseError::NoValidRecords(
            "no usable VEVENT components in ICS input".to_string(),
        ));
    }
    Ok(ParseOutcome {
        records,
        format: Format::Ics,
        warnings,
        skipped,
    })
}

fn parse_csv_input(
    text: &str,
    source_override: Option<SourceOverride>,
) -> Result<ParseOutcome, ParseError> {
    let headers = csv::read_headers(text)?;
    let detected = format::detect_csv_template(&headers);

    let resolved = match (source_override, detected) {
        (Some(over), _) => over.format(),
        (None, Some(found)) => found,
        (None, None) => {
            return Err(ParseError::UnrecognizedFormat(
                "CSV header matches neither the Outlook nor the Google export schema".to_string(),
            ));
        }
    };

    let (mut raws, mut warnings, skipped) = csv::parse_rows(text, resolved)?;

    if let (Some(over), Some(found)) = (source_override, detected) {
        if over.format() != found {
            warnings.push(ParseWarning::new(
                WarningKind::OverrideMismatch,
                "header",
                format!("using override {} (auto-detected: {})", over.format(), found),
            ));
        }
    }

    raw::mark_recurring_hints(&mut raws);
    let records = raw::normalize_records(&raws, &mut warnings);
    if records.is_empty() {
        return Err(ParseError::NoValidRecords(
            "no usable rows in CSV input".to_string(),
        ));
    }
    Ok(ParseOutcome {
        records,
        format: resolved,
        warnings,
        skipped,
    })
}
