//! CSV export readers for the Outlook and Google Calendar schemas.
//!
//! Each template is a fixed column-name table taken from the vendor export
//! format. Rows missing a required timestamp are skipped and reported, never
//! fatal. CSV timestamps carry no timezone and are taken as UTC.

use chrono::{NaiveDate, NaiveTime};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{ParseError, ParseWarning, WarningKind};
use crate::format::Format;
use crate::raw::{RawRecord, RawTime};

/// Date layouts tried in order for every date cell.
const DATE_FORMATS: [&str; 7] = [
    "%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y", "%m-%d-%Y", "%m/%d/%y", "%d/%m/%y", "%Y/%m/%d",
];

/// Time layouts tried in order for every time cell.
const TIME_FORMATS: [&str; 4] = ["%I:%M:%S %p", "%I:%M %p", "%H:%M:%S", "%H:%M"];

/// Candidate column names per normalized field, one table per template.
struct ColumnTable {
    subject: &'static [&'static str],
    start_date: &'static [&'static str],
    start_time: &'static [&'static str],
    end_date: &'static [&'static str],
    end_time: &'static [&'static str],
    all_day: &'static [&'static str],
    organizer: &'static [&'static str],
    recurring: &'static [&'static str],
}

/// The Outlook calendar export schema.
const OUTLOOK_COLUMNS: ColumnTable = ColumnTable {
    subject: &["Subject"],
    start_date: &["Start Date"],
    start_time: &["Start Time"],
    end_date: &["End Date"],
    end_time: &["End Time"],
    all_day: &["All day event", "All Day Event"],
    organizer: &["Organizer", "Meeting Organizer"],
    recurring: &["Recurring", "Is Recurring"],
};

/// The Google Calendar export schema. Google exports carry no organizer or
/// recurrence columns.
const GOOGLE_COLUMNS: ColumnTable = ColumnTable {
    subject: &["Subject", "Title"],
    start_date: &["Start Date"],
    start_time: &["Start Time"],
    end_date: &["End Date"],
    end_time: &["End Time"],
    all_day: &["All Day Event", "All day event"],
    organizer: &[],
    recurring: &[],
};

impl ColumnTable {
    fn for_format(format: Format) -> &'static ColumnTable {
        match format {
            Format::OutlookCsv => &OUTLOOK_COLUMNS,
            _ => &GOOGLE_COLUMNS,
        }
    }
}

/// Reads the (trimmed) header row of a CSV export.
pub fn read_headers(text: &str) -> Result<Vec<String>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| ParseError::UnrecognizedFormat(format!("unreadable CSV header: {e}")))?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

/// Parses CSV rows into raw records using the given template.
///
/// Returns the raw records, the collected warnings, and the number of
/// skipped rows.
pub fn parse_rows(
    text: &str,
    format: Format,
) -> Result<(Vec<RawRecord>, Vec<ParseWarning>, usize), ParseError> {
    let table = ColumnTable::for_format(format);
    let headers = read_headers(text)?;

    let subject_col = find_column(&headers, table.subject);
    let start_date_col = find_column(&headers, table.start_date);
    let start_time_col = find_column(&headers, table.start_time);
    let end_date_col = find_column(&headers, table.end_date);
    let end_time_col = find_column(&headers, table.end_time);
    let all_day_col = find_column(&headers, table.all_day);
    let organizer_col = find_column(&headers, table.organizer);
    let recurring_col = find_column(&headers, table.recurring);

    let (Some(start_date_col), Some(end_date_col)) = (start_date_col, end_date_col) else {
        return Err(ParseError::UnrecognizedFormat(
            "CSV header lacks the Start Date / End Date columns".to_string(),
        ));
    };

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut raws = Vec::new();
    let mut warnings = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in reader.records().enumerate() {
        // Header is line 1; data starts on line 2.
        let location = format!("row {}", index + 2);

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warnings.push(ParseWarning::new(
                    WarningKind::MalformedRow,
                    &location,
                    format!("unreadable row: {e}"),
                ));
                skipped += 1;
                continue;
            }
        };

        let get = |col: Option<usize>| col.and_then(|i| row.get(i)).unwrap_or("");

        let Some(start) = parse_timestamp(get(Some(start_date_col)), get(start_time_col)) else {
            warnings.push(ParseWarning::new(
                WarningKind::MalformedRow,
                &location,
                "missing or unparseable start timestamp",
            ));
            skipped += 1;
            continue;
        };
        let Some(end) = parse_timestamp(get(Some(end_date_col)), get(end_time_col)) else {
            warnings.push(ParseWarning::new(
                WarningKind::MalformedRow,
                &location,
                "missing or unparseable end timestamp",
            ));
            skipped += 1;
            continue;
        };

        let mut raw = RawRecord::new(start, end, &location);
        let subject = get(subject_col).trim();
        if !subject.is_empty() {
            raw = raw.with_subject(subject);
        }
        if all_day_col.is_some() {
            raw = raw.with_all_day_hint(parse_bool(get(all_day_col)));
        }
        let organizer = get(organizer_col).trim();
        if !organizer.is_empty() {
            raw = raw.with_organizer(organizer);
        }
        if recurring_col.is_some() {
            raw = raw.with_recurring_hint(parse_bool(get(recurring_col)));
        }

        raws.push(raw);
    }

    debug!(
        format = %format,
        records = raws.len(),
        skipped,
        "parsed CSV export"
    );

    Ok((raws, warnings, skipped))
}

/// Finds the first matching column index for a list of candidate names.
fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
}

/// Parses a date cell plus an optional time cell.
///
/// An empty time cell yields a date-only value; an unparseable one falls
/// back to midnight of the parsed date, matching how vendor exports pad
/// all-day rows.
fn parse_timestamp(date_str: &str, time_str: &str) -> Option<RawTime> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }
    let time_str = time_str.trim();

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())?;

    if time_str.is_empty() {
        return Some(RawTime::from_date(date));
    }
    for fmt in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(time_str, fmt) {
            return Some(RawTime::from_datetime(date.and_time(time).and_utc()));
        }
    }
    Some(RawTime::from_datetime(
        date.and_hms_opt(0, 0, 0).expect("valid time").and_utc(),
    ))
}

/// Parses the boolean representations seen in vendor exports.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}
