//! Golden tests for report rendering.
//!
//! These use insta inline snapshots to pin the exact Markdown byte layout.
//! Run `cargo insta review` to update after intentional format changes.

use chrono::{DateTime, TimeZone, Utc};

use crate::metrics::{MetricsConfig, compute_metrics};
use crate::record::MeetingRecord;
use crate::report::{ReportOptions, render_markdown};
use crate::summary::generate_summary;
use crate::time::EventTime;

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn meeting(subject: &str, start: DateTime<Utc>, minutes: i64) -> MeetingRecord {
    MeetingRecord::new(
        subject,
        EventTime::from_utc(start),
        EventTime::from_utc(start + chrono::Duration::minutes(minutes)),
    )
}

/// A small fixed Monday: a 30-minute standup and a recurring 90-minute
/// planning session.
fn monday_records() -> Vec<MeetingRecord> {
    vec![
        meeting("Standup", utc(2026, 3, 2, 9, 0, 0), 30),
        meeting("Planning", utc(2026, 3, 2, 10, 0, 0), 90)
            .with_recurring(true)
            .with_organizer("alice@example.com"),
    ]
}

#[test]
fn golden_empty_report() {
    let metrics = compute_metrics(&[], &MetricsConfig::default());
    let summary = generate_summary(&metrics);
    let output = render_markdown(&metrics, &summary, &ReportOptions::default());

    insta::assert_snapshot!(output, @r"
    # Calendar Audit Summary

    ---

    ## Overview

    No meeting data was available for this period; the calendar contained no meetings matching the current filters.

    _No data: zero meetings matched the current filters._

    ---

    Once a calendar export with meeting data is loaded, observations and considerations will appear here.
    ");
}

#[test]
fn golden_monday_report() {
    let records = monday_records();
    let metrics = compute_metrics(&records, &MetricsConfig::default());
    let summary = generate_summary(&metrics);
    let output = render_markdown(&metrics, &summary, &ReportOptions::default());

    insta::assert_snapshot!(output, @r"
    # Calendar Audit Summary

    ---

    ## Overview

    This analysis covers 2 meetings totaling 2.0 hours, with an average duration of 60 minutes. Meeting load appears balanced relative to available time. Recurring meetings represent a notable portion (75.0%) of total time.

    ## Key Metrics

    | Metric | Value |
    | --- | --- |
    | Total meeting hours | 2.0 |
    | Total meetings | 2 |
    | Average duration | 60m |
    | Recurring share | 75.0% |

    ## Meeting Load by Weekday

    | Day | Hours |
    | --- | --- |
    | Monday | 2.0 |
    | Tuesday | 0.0 |
    | Wednesday | 0.0 |
    | Thursday | 0.0 |
    | Friday | 0.0 |
    | Saturday | 0.0 |
    | Sunday | 0.0 |

    ## Duration Distribution

    | Duration | Meetings |
    | --- | --- |
    | <15m | 0 |
    | 15-30m | 1 |
    | 30-60m | 0 |
    | 60-120m | 1 |
    | >120m | 0 |

    ## Top Meetings by Time

    | Meeting | Start | Duration (min) | Organizer |
    | --- | --- | --- | --- |
    | Planning | 2026-03-02 10:00 | 90 | alice@example.com |
    | Standup | 2026-03-02 09:00 | 30 | - |

    ## Top Subjects

    | Subject | Occurrences | Total Hours | Avg (min) |
    | --- | --- | --- | --- |
    | Planning | 1 | 1.5 | 90 |
    | Standup | 1 | 0.5 | 30 |

    ## Top Organizers

    | Organizer | Meetings | Total Hours |
    | --- | --- | --- |
    | alice@example.com | 1 | 1.5 |

    ## Long Meetings

    | Meeting | Date | Duration (min) | Organizer |
    | --- | --- | --- | --- |
    | Planning | 2026-03-02 | 90 | alice@example.com |

    ## Key Observations

    - The calendar reflects an average of 2.0 hours in meetings per day across the analyzed period.
    - Approximately 75.0% of meeting time appears to be allocated to recurring commitments.
    - Monday currently carries the highest meeting load at 2.0 hours.
    - The most frequently scheduled meeting length is 30 minutes.

    ## Considerations

    - One potential adjustment is shifting to 25-minute meetings where appropriate, allowing brief transitions between calls.
    - Based on the recurring meeting volume, a periodic review of standing commitments may surface opportunities to consolidate or adjust frequency.

    ---

    These observations are intended to support informed decisions about calendar management. The current structure provides a foundation that can be refined as priorities evolve. Happy to discuss any of these patterns in more detail or explore specific adjustments.
    ");
}

#[test]
fn golden_prepared_date_line() {
    let metrics = compute_metrics(&[], &MetricsConfig::default());
    let summary = generate_summary(&metrics);
    let options = ReportOptions::default()
        .with_title("Weekly Calendar Audit")
        .with_prepared_on(chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    let output = render_markdown(&metrics, &summary, &options);

    insta::assert_snapshot!(output, @r"
    # Weekly Calendar Audit

    *Prepared March 02, 2026*

    ---

    ## Overview

    No meeting data was available for this period; the calendar contained no meetings matching the current filters.

    _No data: zero meetings matched the current filters._

    ---

    Once a calendar export with meeting data is loaded, observations and considerations will appear here.
    ");
}
