//! Meeting record type.
//!
//! [`MeetingRecord`] is the canonical representation of one calendar event
//! after parsing and normalization. Records are created once by the parser
//! and never mutated downstream; the filter stage produces subsets by copy.

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::time::EventTime;

/// Fallback subject for events with a missing or blank summary.
pub const NO_SUBJECT: &str = "(No subject)";

/// A normalized calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRecord {
    /// The event subject/summary. May be empty.
    pub subject: String,
    /// When the event starts.
    pub start: EventTime,
    /// When the event ends. Never earlier than `start` once normalized.
    pub end: EventTime,
    /// Duration in minutes. Always non-negative.
    pub duration_minutes: i64,
    /// Whether this is an all-day event.
    pub is_all_day: bool,
    /// Whether this event is (believed to be) part of a recurring series.
    ///
    /// Best-effort signal: set from explicit source indicators where the
    /// export carries them, otherwise from heuristics over the record set.
    pub is_recurring: bool,
    /// The organizer, if known. May be empty.
    pub organizer: String,
}

impl MeetingRecord {
    /// Creates a record with the duration derived from `start` and `end`.
    ///
    /// A negative span is clamped to zero; callers that care about the
    /// malformed input should detect it before construction and record a
    /// warning.
    pub fn new(subject: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        let duration_minutes = (end.to_utc_datetime() - start.to_utc_datetime())
            .num_minutes()
            .max(0);
        Self {
            subject: subject.into(),
            start,
            end,
            duration_minutes,
            is_all_day: start.is_all_day(),
            is_recurring: false,
            organizer: String::new(),
        }
    }

    /// Builder method to override the derived duration.
    ///
    /// Used for all-day events, whose duration is whole days rather than the
    /// midnight-to-midnight span of the boundary timestamps.
    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes.max(0);
        self
    }

    /// Builder method to override the all-day flag.
    ///
    /// CSV exports signal all-day through a dedicated column even when the
    /// row carries full timestamps.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.is_all_day = all_day;
        self
    }

    /// Builder method to mark the record as recurring.
    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.is_recurring = recurring;
        self
    }

    /// Builder method to set the organizer.
    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = organizer.into();
        self
    }

    /// Returns the weekday the event starts on.
    pub fn weekday(&self) -> Weekday {
        self.start.date().weekday()
    }

    /// Returns the weekday as an index, Monday = 0 through Sunday = 6.
    pub fn weekday_index(&self) -> usize {
        self.weekday().num_days_from_monday() as usize
    }

    /// Returns the UTC start hour for timed events, `None` for all-day ones.
    pub fn start_hour(&self) -> Option<u32> {
        self.start.as_datetime().map(|dt| dt.hour())
    }
}
