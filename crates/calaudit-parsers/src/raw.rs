//! Raw record type and normalization.
//!
//! Both readers produce [`RawRecord`]s, a thin representation of one source
//! row or component before validation. Normalization turns them into
//! [`MeetingRecord`]s: it derives durations, applies the all-day rules, and
//! coerces `end < start` inputs to zero duration with a warning.

use std::collections::HashMap;

use calaudit_core::record::{MeetingRecord, NO_SUBJECT};
use calaudit_core::time::EventTime;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ParseWarning, WarningKind};

/// Subjects containing one of these (case-insensitive) read as a recurring
/// cadence. Best-effort signal recovered from repeated real-world exports.
const RECURRING_KEYWORDS: [&str; 16] = [
    "weekly",
    "daily",
    "standup",
    "stand-up",
    "stand up",
    "sync",
    "1:1",
    "1-1",
    "one on one",
    "recurring",
    "retro",
    "sprint",
    "scrum",
    "planning",
    "review",
    "check-in",
];

/// The time specification for a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTime {
    /// A specific datetime in UTC.
    DateTime(DateTime<Utc>),
    /// A date-only boundary (all-day event).
    Date(NaiveDate),
}

impl RawTime {
    /// Creates a `RawTime` from a UTC datetime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates a `RawTime` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Date(date)
    }

    /// Returns true if this is a date-only time.
    pub fn is_date_only(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    fn to_event_time(self) -> EventTime {
        match self {
            Self::DateTime(dt) => EventTime::from_utc(dt),
            Self::Date(date) => EventTime::from_date(date),
        }
    }
}

/// One source row or component before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// The subject, if the source had one.
    pub subject: Option<String>,
    /// When the event starts.
    pub start: RawTime,
    /// When the event ends.
    pub end: RawTime,
    /// Explicit all-day flag from the source (CSV column), when present.
    pub all_day_hint: Option<bool>,
    /// Explicit recurrence signal from the source (CSV column, RRULE,
    /// RECURRENCE-ID, shared UID).
    pub recurring_hint: bool,
    /// The organizer, if the source had one.
    pub organizer: Option<String>,
    /// Where this record came from: a row number or component UID, used in
    /// warnings.
    pub source: String,
}

impl RawRecord {
    /// Creates a raw record with the required fields.
    pub fn new(start: RawTime, end: RawTime, source: impl Into<String>) -> Self {
        Self {
            subject: None,
            start,
            end,
            all_day_hint: None,
            recurring_hint: false,
            organizer: None,
            source: source.into(),
        }
    }

    /// Builder method to set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Builder method to set the explicit all-day flag.
    pub fn with_all_day_hint(mut self, all_day: bool) -> Self {
        self.all_day_hint = Some(all_day);
        self
    }

    /// Builder method to set the recurrence signal.
    pub fn with_recurring_hint(mut self, recurring: bool) -> Self {
        self.recurring_hint = recurring;
        self
    }

    /// Builder method to set the organizer.
    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }
}

/// Normalizes one raw record into a [`MeetingRecord`].
///
/// A raw record with `end` before `start` is coerced to zero duration and a
/// [`WarningKind::CoercedDuration`] warning is pushed; the record itself
/// survives so it still shows up in counts.
pub fn normalize_record(raw: &RawRecord, warnings: &mut Vec<ParseWarning>) -> MeetingRecord {
    let start = raw.start.to_event_time();
    let mut end = raw.end.to_event_time();

    if end.to_utc_datetime() < start.to_utc_datetime() {
        warnings.push(ParseWarning::new(
            WarningKind::CoercedDuration,
            raw.source.clone(),
            "end precedes start; duration coerced to zero",
        ));
        end = start;
    }

    let subject = raw
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUBJECT);
    let is_all_day = raw.all_day_hint.unwrap_or_else(|| raw.start.is_date_only());

    let mut record = MeetingRecord::new(subject, start, end)
        .with_all_day(is_all_day)
        .with_recurring(raw.recurring_hint)
        .with_organizer(raw.organizer.clone().unwrap_or_default());

    // Date-only boundaries span whole days; DTEND is exclusive, and a
    // missing end means a single day.
    if let (RawTime::Date(s), RawTime::Date(e)) = (raw.start, raw.end) {
        let days = (e - s).num_days().max(1);
        record = record.with_duration(days * 24 * 60);
    }

    record
}

/// Normalizes a batch of raw records.
pub fn normalize_records(
    raws: &[RawRecord],
    warnings: &mut Vec<ParseWarning>,
) -> Vec<MeetingRecord> {
    raws.iter().map(|r| normalize_record(r, warnings)).collect()
}

/// Marks raw records that look recurring.
///
/// Two heuristics, neither of which ever clears an explicit signal: a
/// (case-folded, trimmed) subject appearing two or more times, and subjects
/// containing a known cadence keyword.
pub fn mark_recurring_hints(raws: &mut [RawRecord]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for raw in raws.iter() {
        if let Some(folded) = folded_subject(raw) {
            *counts.entry(folded).or_default() += 1;
        }
    }

    for raw in raws.iter_mut() {
        if raw.recurring_hint {
            continue;
        }
        let Some(folded) = folded_subject(raw) else {
            continue;
        };
        let repeated = counts.get(&folded).copied().unwrap_or(0) >= 2;
        let keyword = RECURRING_KEYWORDS.iter().any(|k| folded.contains(k));
        if repeated || keyword {
            raw.recurring_hint = true;
        }
    }
}

fn folded_subject(raw: &RawRecord) -> Option<String> {
    raw.subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod normalization {
        use super::*;

        #[test]
        fn timed_record() {
            let raw = RawRecord::new(
                RawTime::from_datetime(utc(2026, 3, 2, 9, 0, 0)),
                RawTime::from_datetime(utc(2026, 3, 2, 9, 45, 0)),
                "row 2",
            )
            .with_subject("Design Review")
            .with_organizer("bob@example.com");

            let mut warnings = Vec::new();
            let record = normalize_record(&raw, &mut warnings);

            assert!(warnings.is_empty());
            assert_eq!(record.subject, "Design Review");
            assert_eq!(record.duration_minutes, 45);
            assert!(!record.is_all_day);
            assert_eq!(record.organizer, "bob@example.com");
        }

        #[test]
        fn end_before_start_coerced_with_warning() {
            let raw = RawRecord::new(
                RawTime::from_datetime(utc(2026, 3, 2, 10, 0, 0)),
                RawTime::from_datetime(utc(2026, 3, 2, 9, 0, 0)),
                "row 7",
            )
            .with_subject("Backwards");

            let mut warnings = Vec::new();
            let record = normalize_record(&raw, &mut warnings);

            assert_eq!(record.duration_minutes, 0);
            assert_eq!(record.start, record.end);
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].kind, WarningKind::CoercedDuration);
            assert_eq!(warnings[0].location, "row 7");
        }

        #[test]
        fn blank_subject_replaced() {
            let raw = RawRecord::new(
                RawTime::from_datetime(utc(2026, 3, 2, 9, 0, 0)),
                RawTime::from_datetime(utc(2026, 3, 2, 9, 30, 0)),
                "row 3",
            )
            .with_subject("   ");
            let mut warnings = Vec::new();
            let record = normalize_record(&raw, &mut warnings);
            assert_eq!(record.subject, NO_SUBJECT);
        }

        #[test]
        fn single_day_all_day_event() {
            // DTEND is exclusive: one-day holiday spans exactly one day.
            let raw = RawRecord::new(
                RawTime::from_date(date(2026, 3, 2)),
                RawTime::from_date(date(2026, 3, 3)),
                "holiday-1",
            )
            .with_subject("Company Holiday");

            let mut warnings = Vec::new();
            let record = normalize_record(&raw, &mut warnings);

            assert!(record.is_all_day);
            assert_eq!(record.duration_minutes, 24 * 60);
        }

        #[test]
        fn multi_day_all_day_event() {
            let raw = RawRecord::new(
                RawTime::from_date(date(2026, 3, 2)),
                RawTime::from_date(date(2026, 3, 5)),
                "offsite-1",
            )
            .with_subject("Offsite");

            let mut warnings = Vec::new();
            let record = normalize_record(&raw, &mut warnings);
            assert_eq!(record.duration_minutes, 3 * 24 * 60);
        }

        #[test]
        fn date_only_without_end_spans_one_day() {
            let raw = RawRecord::new(
                RawTime::from_date(date(2026, 3, 2)),
                RawTime::from_date(date(2026, 3, 2)),
                "noend-1",
            );
            let mut warnings = Vec::new();
            let record = normalize_record(&raw, &mut warnings);
            assert!(record.is_all_day);
            assert_eq!(record.duration_minutes, 24 * 60);
        }

        #[test]
        fn csv_all_day_hint_with_timed_bounds() {
            let raw = RawRecord::new(
                RawTime::from_datetime(utc(2026, 3, 2, 0, 0, 0)),
                RawTime::from_datetime(utc(2026, 3, 3, 0, 0, 0)),
                "row 9",
            )
            .with_subject("PTO")
            .with_all_day_hint(true);

            let mut warnings = Vec::new();
            let record = normalize_record(&raw, &mut warnings);
            assert!(record.is_all_day);
            assert_eq!(record.duration_minutes, 24 * 60);
        }
    }

    mod recurring_hints {
        use super::*;

        fn raw(subject: &str, hour: u32) -> RawRecord {
            RawRecord::new(
                RawTime::from_datetime(utc(2026, 3, 2, hour, 0, 0)),
                RawTime::from_datetime(utc(2026, 3, 2, hour, 30, 0)),
                format!("row {hour}"),
            )
            .with_subject(subject)
        }

        #[test]
        fn repeated_subject_marked() {
            let mut raws = vec![raw("Budget call", 9), raw("budget call ", 10), raw("Kickoff", 11)];
            mark_recurring_hints(&mut raws);
            assert!(raws[0].recurring_hint);
            assert!(raws[1].recurring_hint);
            assert!(!raws[2].recurring_hint);
        }

        #[test]
        fn cadence_keyword_marked() {
            let mut raws = vec![raw("Team Standup", 9), raw("Quarterly offsite", 10)];
            mark_recurring_hints(&mut raws);
            assert!(raws[0].recurring_hint);
            assert!(!raws[1].recurring_hint);
        }

        #[test]
        fn explicit_signal_never_cleared() {
            let mut raws = vec![raw("Unique title", 9).with_recurring_hint(true)];
            mark_recurring_hints(&mut raws);
            assert!(raws[0].recurring_hint);
        }
    }
}
