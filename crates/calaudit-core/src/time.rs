//! Time types for calendar records.
//!
//! This module provides [`EventTime`] for representing record start/end times
//! (which may be either a specific datetime or an all-day date), and
//! [`TimeWindow`] for bounding recurrence expansion.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Represents the time of a calendar record.
///
/// Calendar events carry two kinds of times:
/// - **DateTime**: a specific point in time, stored as UTC
/// - **AllDay**: a date without a time-of-day component (all-day events)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A specific datetime, stored in UTC.
    DateTime(DateTime<Utc>),
    /// An all-day event date (no specific time).
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates a new `EventTime::DateTime` from a UTC datetime.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates a new `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns `true` if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns `true` if this is a specific datetime.
    pub fn is_datetime(&self) -> bool {
        matches!(self, Self::DateTime(_))
    }

    /// Returns the datetime if this is a `DateTime` variant.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            Self::AllDay(_) => None,
        }
    }

    /// Converts to a UTC datetime for comparison and arithmetic.
    ///
    /// For all-day events, returns midnight UTC on that date.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => *dt,
            Self::AllDay(date) => date.and_hms_opt(0, 0, 0).expect("valid time").and_utc(),
        }
    }

    /// Returns the date portion of this event time.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.date_naive(),
            Self::AllDay(date) => *date,
        }
    }

    /// Checks if this event time is before another event time.
    ///
    /// All-day events are compared at midnight UTC.
    pub fn is_before(&self, other: &EventTime) -> bool {
        self.to_utc_datetime() < other.to_utc_datetime()
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_utc_datetime().cmp(&other.to_utc_datetime())
    }
}

/// A half-open time interval `[start, end)` in UTC.
///
/// Used to bound recurrence expansion: occurrences outside the window are
/// never generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a window centered on `center`, extending `radius` either side.
    pub fn around(center: DateTime<Utc>, radius: Duration) -> Self {
        Self::new(center - radius, center + radius)
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    ///
    /// Uses half-open interval semantics: `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Checks if an event time falls within this window.
    ///
    /// For all-day events, checks if midnight UTC falls within the window.
    pub fn contains_event_time(&self, et: &EventTime) -> bool {
        self.contains(et.to_utc_datetime())
    }
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

    mod event_time {
        use super::*;

        #[test]
        fn datetime_creation() {
            let dt = utc(2026, 3, 2, 10, 30, 0);
            let et = EventTime::from_utc(dt);
            assert!(et.is_datetime());
            assert!(!et.is_all_day());
            assert_eq!(et.as_datetime(), Some(&dt));
        }

        #[test]
        fn allday_creation() {
            let d = date(2026, 3, 2);
            let et = EventTime::from_date(d);
            assert!(et.is_all_day());
            assert!(!et.is_datetime());
            assert_eq!(et.as_datetime(), None);
        }

        #[test]
        fn to_utc_datetime() {
            let dt = utc(2026, 3, 2, 10, 30, 0);
            assert_eq!(EventTime::from_utc(dt).to_utc_datetime(), dt);

            let d = date(2026, 3, 2);
            assert_eq!(
                EventTime::from_date(d).to_utc_datetime(),
                utc(2026, 3, 2, 0, 0, 0)
            );
        }

        #[test]
        fn date_extraction() {
            let et = EventTime::from_utc(utc(2026, 3, 2, 23, 59, 0));
            assert_eq!(et.date(), date(2026, 3, 2));

            let et = EventTime::from_date(date(2026, 4, 15));
            assert_eq!(et.date(), date(2026, 4, 15));
        }

        #[test]
        fn ordering() {
            let et1 = EventTime::from_utc(utc(2026, 3, 2, 10, 0, 0));
            let et2 = EventTime::from_utc(utc(2026, 3, 2, 11, 0, 0));
            let et3 = EventTime::from_date(date(2026, 3, 2));

            assert!(et3 < et1); // midnight < 10:00
            assert!(et1 < et2);
            assert!(et1.is_before(&et2));
        }

        #[test]
        fn serde_roundtrip() {
            let et = EventTime::from_utc(utc(2026, 3, 2, 10, 30, 0));
            let json = serde_json::to_string(&et).unwrap();
            let parsed: EventTime = serde_json::from_str(&json).unwrap();
            assert_eq!(et, parsed);

            let et = EventTime::from_date(date(2026, 3, 2));
            let json = serde_json::to_string(&et).unwrap();
            let parsed: EventTime = serde_json::from_str(&json).unwrap();
            assert_eq!(et, parsed);
        }
    }

    mod time_window {
        use super::*;

        #[test]
        fn creation() {
            let start = utc(2026, 3, 2, 9, 0, 0);
            let end = utc(2026, 3, 2, 17, 0, 0);
            let window = TimeWindow::new(start, end);
            assert_eq!(window.start, start);
            assert_eq!(window.end, end);
            assert_eq!(window.duration(), Duration::hours(8));
        }

        #[test]
        #[should_panic(expected = "start must be <= end")]
        fn invalid_window() {
            TimeWindow::new(utc(2026, 3, 2, 17, 0, 0), utc(2026, 3, 2, 9, 0, 0));
        }

        #[test]
        fn contains_datetime() {
            let window = TimeWindow::new(utc(2026, 3, 2, 9, 0, 0), utc(2026, 3, 2, 17, 0, 0));

            assert!(window.contains(utc(2026, 3, 2, 10, 0, 0)));
            assert!(window.contains(utc(2026, 3, 2, 9, 0, 0))); // start inclusive
            assert!(!window.contains(utc(2026, 3, 2, 17, 0, 0))); // end exclusive
            assert!(!window.contains(utc(2026, 3, 2, 8, 59, 59)));
        }

        #[test]
        fn around_center() {
            let center = utc(2026, 3, 2, 12, 0, 0);
            let window = TimeWindow::around(center, Duration::days(1));
            assert_eq!(window.start, utc(2026, 3, 1, 12, 0, 0));
            assert_eq!(window.end, utc(2026, 3, 3, 12, 0, 0));
            assert!(window.contains(center));
        }

        #[test]
        fn contains_event_time() {
            let window = TimeWindow::new(utc(2026, 3, 1, 0, 0, 0), utc(2026, 3, 8, 0, 0, 0));
            assert!(window.contains_event_time(&EventTime::from_date(date(2026, 3, 4))));
            assert!(!window.contains_event_time(&EventTime::from_date(date(2026, 3, 9))));
        }
    }
}
