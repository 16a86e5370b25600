//! ICS/iCalendar parsing.
//!
//! Parses iCalendar (RFC 5545) text and converts each VEVENT component to
//! one or more [`RawRecord`]s. Components carrying an RRULE are expanded to
//! one record per occurrence, bounded by the caller's [`ExpansionPolicy`].
//! Cancelled components are dropped with a warning; malformed ones are
//! skipped with a warning, never fatal.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
    EventStatus,
};
use tracing::debug;

use crate::error::{ParseError, ParseWarning, WarningKind};
use crate::expand::{ExpansionPolicy, expand_occurrences};
use crate::raw::{RawRecord, RawTime};

/// Parses ICS content into raw records.
///
/// Returns the raw records, the collected warnings, and the number of
/// skipped components. Text that is not valid iCalendar at all fails with
/// [`ParseError::UnrecognizedFormat`].
pub fn parse_ics(
    text: &str,
    policy: &ExpansionPolicy,
) -> Result<(Vec<RawRecord>, Vec<ParseWarning>, usize), ParseError> {
    let calendar: Calendar = text
        .parse()
        .map_err(|e| ParseError::UnrecognizedFormat(format!("invalid iCalendar text: {e}")))?;

    let events: Vec<&Event> = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(event),
            _ => None,
        })
        .collect();

    // Components sharing a UID are recurrence exceptions or split series;
    // both read as a recurring signal.
    let mut uid_counts: HashMap<&str, usize> = HashMap::new();
    for event in &events {
        if let Some(uid) = event.get_uid() {
            *uid_counts.entry(uid).or_default() += 1;
        }
    }

    let mut raws = Vec::new();
    let mut warnings = Vec::new();
    let mut skipped = 0usize;

    for event in &events {
        let uid = event.get_uid().unwrap_or("(no uid)").to_string();
        let shared_uid = event
            .get_uid()
            .map(|uid| uid_counts.get(uid).copied().unwrap_or(0) >= 2)
            .unwrap_or(false);

        match convert_event(event, &uid, shared_uid, policy, &mut warnings) {
            Some(mut records) => raws.append(&mut records),
            None => skipped += 1,
        }
    }

    debug!(
        components = events.len(),
        records = raws.len(),
        skipped,
        "parsed ICS export"
    );

    Ok((raws, warnings, skipped))
}

/// Converts one VEVENT into raw records, expanding recurrence.
fn convert_event(
    event: &Event,
    uid: &str,
    shared_uid: bool,
    policy: &ExpansionPolicy,
    warnings: &mut Vec<ParseWarning>,
) -> Option<Vec<RawRecord>> {
    if matches!(event.get_status(), Some(EventStatus::Cancelled)) {
        warnings.push(ParseWarning::new(
            WarningKind::DroppedCancelled,
            uid,
            "cancelled event dropped",
        ));
        return None;
    }

    let Some(start_dt) = event.get_start() else {
        warnings.push(ParseWarning::new(
            WarningKind::MalformedComponent,
            uid,
            "missing DTSTART",
        ));
        return None;
    };
    let end_dt = event.get_end().unwrap_or_else(|| start_dt.clone());

    let start = convert_date_time(start_dt);
    let end = convert_date_time(end_dt);

    let rrule = event.property_value("RRULE");
    let recurring =
        rrule.is_some() || event.property_value("RECURRENCE-ID").is_some() || shared_uid;

    let base = build_raw(event, uid, start, end, recurring);

    let Some(rule) = rrule else {
        return Some(vec![base]);
    };

    // Expansion works in instants; date-only starts are anchored at
    // midnight UTC and converted back afterwards.
    let dtstart = match start {
        RawTime::DateTime(dt) => dt,
        RawTime::Date(date) => Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("valid time")),
    };
    let span = end_span(&start, &end);

    let expansion = match expand_occurrences(rule, dtstart, policy) {
        Ok(expansion) => expansion,
        Err(e) => {
            warnings.push(ParseWarning::new(
                WarningKind::MalformedComponent,
                uid,
                format!("invalid RRULE, kept single occurrence: {e}"),
            ));
            return Some(vec![base]);
        }
    };
    if expansion.capped {
        warnings.push(ParseWarning::new(
            WarningKind::ExpansionCapped,
            uid,
            format!(
                "recurrence expansion truncated at {} instances",
                policy.max_instances
            ),
        ));
    }
    if expansion.occurrences.is_empty() {
        // Rule valid but nothing falls inside the window; keep the seed so
        // the event is not silently lost.
        return Some(vec![base]);
    }

    let records = expansion
        .occurrences
        .iter()
        .map(|occurrence| {
            let (occ_start, occ_end) = match span {
                Span::Minutes(minutes) => (
                    RawTime::from_datetime(*occurrence),
                    RawTime::from_datetime(*occurrence + chrono::Duration::minutes(minutes)),
                ),
                Span::Days(days) => {
                    let date = occurrence.date_naive();
                    (
                        RawTime::from_date(date),
                        RawTime::from_date(date + chrono::Duration::days(days)),
                    )
                }
            };
            build_raw(event, uid, occ_start, occ_end, true)
        })
        .collect();

    Some(records)
}

#[derive(Clone, Copy)]
enum Span {
    Minutes(i64),
    Days(i64),
}

/// The base event's extent, carried onto every expanded occurrence.
fn end_span(start: &RawTime, end: &RawTime) -> Span {
    match (start, end) {
        (RawTime::Date(s), RawTime::Date(e)) => Span::Days((*e - *s).num_days().max(1)),
        _ => {
            let start_utc = match start {
                RawTime::DateTime(dt) => *dt,
                RawTime::Date(d) => Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).expect("valid time")),
            };
            let end_utc = match end {
                RawTime::DateTime(dt) => *dt,
                RawTime::Date(d) => Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).expect("valid time")),
            };
            Span::Minutes((end_utc - start_utc).num_minutes().max(0))
        }
    }
}

fn build_raw(event: &Event, uid: &str, start: RawTime, end: RawTime, recurring: bool) -> RawRecord {
    let mut raw = RawRecord::new(start, end, uid).with_recurring_hint(recurring);

    if let Some(summary) = event.get_summary() {
        raw = raw.with_subject(summary);
    }
    if let Some(organizer) = event.property_value("ORGANIZER") {
        raw = raw.with_organizer(strip_mailto(organizer));
    }

    raw
}

/// Converts icalendar's DatePerhapsTime to a RawTime.
///
/// Floating and zoned datetimes are taken at their wall-clock value in UTC;
/// resolving VTIMEZONE definitions is out of scope for load statistics.
fn convert_date_time(dt: DatePerhapsTime) -> RawTime {
    match dt {
        DatePerhapsTime::Date(date) => RawTime::from_date(date),
        DatePerhapsTime::DateTime(cdt) => {
            let utc_dt = match cdt {
                CalendarDateTime::Utc(dt) => dt,
                CalendarDateTime::Floating(naive) => Utc.from_utc_datetime(&naive),
                CalendarDateTime::WithTimezone { date_time, tzid: _ } => {
                    Utc.from_utc_datetime(&date_time)
                }
            };
            RawTime::from_datetime(utc_dt)
        }
    }
}

/// Strips a leading `mailto:` from an ORGANIZER value.
fn strip_mailto(value: &str) -> &str {
    let trimmed = value.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("mailto:") => &trimmed[7..],
        _ => trimmed,
    }
}
