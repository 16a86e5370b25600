//! Metrics engine.
//!
//! Computes aggregate meeting-load statistics from a slice of filtered
//! [`MeetingRecord`]s. Every aggregate is a deterministic, side-effect-free
//! function of its input: identical records and configuration always produce
//! an identical [`MetricsReport`], and a zero-record input yields an all-zero
//! report rather than an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::MeetingRecord;
use crate::time::EventTime;

/// Weekday display names, Monday first, matching [`MeetingRecord::weekday_index`].
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Duration bucket labels for the distribution histogram.
///
/// Boundaries in minutes: `[0, 15)`, `[15, 30]`, `(30, 60]`, `(60, 120]`,
/// and over 120. A meeting of exactly 30, 60 or 120 minutes counts in the
/// bucket whose upper bound it equals.
pub const DURATION_BUCKET_LABELS: [&str; 5] = ["<15m", "15-30m", "30-60m", "60-120m", ">120m"];

/// Meetings starting before this UTC hour count as "early".
const EARLY_HOUR: u32 = 9;
/// Meetings starting at or after this UTC hour count as "late".
const LATE_HOUR: u32 = 17;

/// Tunable knobs for the metrics engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Number of entries in the top-meetings / top-subjects / top-organizers
    /// tables.
    pub top_n: usize,
    /// Meetings strictly longer than this many minutes count as "long".
    pub long_meeting_minutes: i64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            long_meeting_minutes: 60,
        }
    }
}

/// One record projected for the ranked tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSlot {
    /// The event subject.
    pub subject: String,
    /// When the event starts.
    pub start: EventTime,
    /// Duration in minutes.
    pub duration_minutes: i64,
    /// The organizer, possibly empty.
    pub organizer: String,
}

impl MeetingSlot {
    fn from_record(record: &MeetingRecord) -> Self {
        Self {
            subject: record.subject.clone(),
            start: record.start,
            duration_minutes: record.duration_minutes,
            organizer: record.organizer.clone(),
        }
    }
}

/// Per-subject aggregation: how much time a recurring title consumes overall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectLoad {
    /// The (verbatim) subject.
    pub subject: String,
    /// Number of records carrying this subject.
    pub occurrences: usize,
    /// Total minutes across all occurrences.
    pub total_minutes: i64,
    /// Mean minutes per occurrence.
    pub avg_minutes: f64,
}

/// Per-organizer aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerLoad {
    /// The organizer. Never empty; records without an organizer are skipped.
    pub organizer: String,
    /// Number of meetings this organizer scheduled.
    pub meetings: usize,
    /// Total minutes across those meetings.
    pub total_minutes: i64,
}

/// Bucketed counts of meeting durations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationDistribution {
    /// Counts per bucket, same order as [`DURATION_BUCKET_LABELS`].
    pub buckets: [usize; 5],
}

impl DurationDistribution {
    fn bucket_index(minutes: i64) -> usize {
        if minutes < 15 {
            0
        } else if minutes <= 30 {
            1
        } else if minutes <= 60 {
            2
        } else if minutes <= 120 {
            3
        } else {
            4
        }
    }

    /// Iterates `(label, count)` pairs in bucket order.
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        DURATION_BUCKET_LABELS
            .iter()
            .copied()
            .zip(self.buckets.iter().copied())
    }
}

/// Pattern signals detected over the record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patterns {
    /// Weekday carrying the most meeting minutes, `None` when there is no data.
    pub busiest_weekday: Option<String>,
    /// Minutes on the busiest weekday.
    pub busiest_weekday_minutes: i64,
    /// Meetings of 30 minutes or less.
    pub short_meetings: usize,
    /// Meetings over 30 and up to 60 minutes.
    pub medium_meetings: usize,
    /// Meetings over 60 minutes.
    pub long_meetings: usize,
    /// Hours spent in meetings over 60 minutes.
    pub long_meeting_hours: f64,
    /// Number of distinct days with at least one meeting.
    pub active_days: usize,
    /// Mean meetings per active day.
    pub avg_meetings_per_day: f64,
    /// Mean meeting hours per active day.
    pub avg_hours_per_day: f64,
    /// Most meetings on a single day.
    pub max_meetings_per_day: usize,
    /// Most common duration, rounded to the nearest 15 minutes.
    pub most_common_duration: Option<i64>,
    /// Timed meetings starting before 9:00 UTC.
    pub early_meetings: usize,
    /// Timed meetings starting at or after 17:00 UTC.
    pub late_meetings: usize,
}

/// The full set of aggregates computed from filtered records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Total meeting hours.
    pub total_hours: f64,
    /// Number of meetings.
    pub total_meetings: usize,
    /// Mean duration in minutes, 0 when there are no records.
    pub avg_duration_minutes: f64,
    /// Share of meeting time in recurring meetings, in `[0, 100]`.
    pub recurring_percent: f64,
    /// Minutes per weekday, Monday first; all seven entries always present.
    pub by_weekday: [i64; 7],
    /// Histogram of meeting durations.
    pub duration_distribution: DurationDistribution,
    /// Records sorted by duration descending, start ascending; top N.
    pub top_meetings: Vec<MeetingSlot>,
    /// Subjects by total time, descending, ties alphabetical; top N.
    pub top_subjects: Vec<SubjectLoad>,
    /// Organizers by total time, descending, ties alphabetical; top N.
    pub top_organizers: Vec<OrganizerLoad>,
    /// Records strictly above the long-meeting threshold, duration descending.
    pub long_meetings: Vec<MeetingSlot>,
    /// Detected pattern signals.
    pub patterns: Patterns,
}

impl MetricsReport {
    /// Returns `true` when the report was computed from zero records.
    pub fn is_empty(&self) -> bool {
        self.total_meetings == 0
    }
}

/// Computes the full metrics report for a set of filtered records.
pub fn compute_metrics(records: &[MeetingRecord], config: &MetricsConfig) -> MetricsReport {
    if records.is_empty() {
        return MetricsReport::default();
    }

    let total_minutes: i64 = records.iter().map(|r| r.duration_minutes).sum();
    let total_meetings = records.len();
    let avg_duration_minutes = total_minutes as f64 / total_meetings as f64;

    let recurring_minutes: i64 = records
        .iter()
        .filter(|r| r.is_recurring)
        .map(|r| r.duration_minutes)
        .sum();
    let recurring_percent = if total_minutes > 0 {
        recurring_minutes as f64 / total_minutes as f64 * 100.0
    } else {
        0.0
    };

    let mut by_weekday = [0i64; 7];
    let mut duration_distribution = DurationDistribution::default();
    for record in records {
        by_weekday[record.weekday_index()] += record.duration_minutes;
        duration_distribution.buckets[DurationDistribution::bucket_index(
            record.duration_minutes,
        )] += 1;
    }

    MetricsReport {
        total_hours: total_minutes as f64 / 60.0,
        total_meetings,
        avg_duration_minutes,
        recurring_percent,
        by_weekday,
        duration_distribution,
        top_meetings: top_meetings(records, config.top_n),
        top_subjects: top_subjects(records, config.top_n),
        top_organizers: top_organizers(records, config.top_n),
        long_meetings: long_meetings(records, config.long_meeting_minutes),
        patterns: detect_patterns(records, &by_weekday),
    }
}

/// Records sorted by duration descending, ties broken by start ascending.
fn top_meetings(records: &[MeetingRecord], top_n: usize) -> Vec<MeetingSlot> {
    let mut slots: Vec<MeetingSlot> = records.iter().map(MeetingSlot::from_record).collect();
    slots.sort_by(|a, b| {
        b.duration_minutes
            .cmp(&a.duration_minutes)
            .then_with(|| a.start.cmp(&b.start))
    });
    slots.truncate(top_n);
    slots
}

/// Per-subject totals, descending by time, ties alphabetical.
fn top_subjects(records: &[MeetingRecord], top_n: usize) -> Vec<SubjectLoad> {
    // BTreeMap keeps iteration order stable across runs.
    let mut grouped: BTreeMap<&str, (usize, i64)> = BTreeMap::new();
    for record in records {
        let entry = grouped.entry(record.subject.as_str()).or_default();
        entry.0 += 1;
        entry.1 += record.duration_minutes;
    }

    let mut loads: Vec<SubjectLoad> = grouped
        .into_iter()
        .map(|(subject, (occurrences, total_minutes))| SubjectLoad {
            subject: subject.to_string(),
            occurrences,
            total_minutes,
            avg_minutes: total_minutes as f64 / occurrences as f64,
        })
        .collect();
    loads.sort_by(|a, b| {
        b.total_minutes
            .cmp(&a.total_minutes)
            .then_with(|| a.subject.cmp(&b.subject))
    });
    loads.truncate(top_n);
    loads
}

/// Per-organizer totals; records without an organizer are skipped.
fn top_organizers(records: &[MeetingRecord], top_n: usize) -> Vec<OrganizerLoad> {
    let mut grouped: BTreeMap<&str, (usize, i64)> = BTreeMap::new();
    for record in records {
        let organizer = record.organizer.trim();
        if organizer.is_empty() {
            continue;
        }
        let entry = grouped.entry(organizer).or_default();
        entry.0 += 1;
        entry.1 += record.duration_minutes;
    }

    let mut loads: Vec<OrganizerLoad> = grouped
        .into_iter()
        .map(|(organizer, (meetings, total_minutes))| OrganizerLoad {
            organizer: organizer.to_string(),
            meetings,
            total_minutes,
        })
        .collect();
    loads.sort_by(|a, b| {
        b.total_minutes
            .cmp(&a.total_minutes)
            .then_with(|| a.organizer.cmp(&b.organizer))
    });
    loads.truncate(top_n);
    loads
}

/// Records strictly above the threshold, duration descending, start ascending.
fn long_meetings(records: &[MeetingRecord], threshold_minutes: i64) -> Vec<MeetingSlot> {
    let mut slots: Vec<MeetingSlot> = records
        .iter()
        .filter(|r| r.duration_minutes > threshold_minutes)
        .map(MeetingSlot::from_record)
        .collect();
    slots.sort_by(|a, b| {
        b.duration_minutes
            .cmp(&a.duration_minutes)
            .then_with(|| a.start.cmp(&b.start))
    });
    slots
}

fn detect_patterns(records: &[MeetingRecord], by_weekday: &[i64; 7]) -> Patterns {
    let mut patterns = Patterns::default();

    // Busiest weekday; earliest weekday wins ties so output stays stable.
    if let Some((index, minutes)) = by_weekday
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, m)| *m > 0)
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    {
        patterns.busiest_weekday = Some(WEEKDAY_NAMES[index].to_string());
        patterns.busiest_weekday_minutes = minutes;
    }

    let mut long_minutes = 0i64;
    for record in records {
        let d = record.duration_minutes;
        if d <= 30 {
            patterns.short_meetings += 1;
        } else if d <= 60 {
            patterns.medium_meetings += 1;
        } else {
            patterns.long_meetings += 1;
            long_minutes += d;
        }
        match record.start_hour() {
            Some(h) if h < EARLY_HOUR => patterns.early_meetings += 1,
            Some(h) if h >= LATE_HOUR => patterns.late_meetings += 1,
            _ => {}
        }
    }
    patterns.long_meeting_hours = long_minutes as f64 / 60.0;

    // Daily load over days with at least one meeting.
    let mut daily: BTreeMap<NaiveDate, (usize, i64)> = BTreeMap::new();
    for record in records {
        let entry = daily.entry(record.start.date()).or_default();
        entry.0 += 1;
        entry.1 += record.duration_minutes;
    }
    if !daily.is_empty() {
        let days = daily.len();
        let total_minutes: i64 = daily.values().map(|(_, m)| m).sum();
        patterns.active_days = days;
        patterns.avg_meetings_per_day = records.len() as f64 / days as f64;
        patterns.avg_hours_per_day = total_minutes as f64 / 60.0 / days as f64;
        patterns.max_meetings_per_day = daily.values().map(|(n, _)| *n).max().unwrap_or(0);
    }

    // Most common duration rounded to the nearest 15 minutes; smallest
    // duration wins ties.
    let mut rounded: BTreeMap<i64, usize> = BTreeMap::new();
    for record in records {
        let bucket = ((record.duration_minutes as f64 / 15.0).round() as i64) * 15;
        *rounded.entry(bucket).or_default() += 1;
    }
    patterns.most_common_duration = rounded
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(duration, _)| duration);

    patterns
}
