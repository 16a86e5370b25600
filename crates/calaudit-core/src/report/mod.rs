//! Markdown report rendering.
//!
//! The report is the one exported artifact: a Markdown document containing
//! the KPI figures, breakdown tables, the insight and consideration lists,
//! and the executive paragraph. Rendering is pure text assembly; identical
//! metrics, summary, and options always produce byte-identical output. The
//! prepared-on date is supplied by the caller rather than read from a clock
//! so that repeated runs over the same input stay reproducible.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::{MetricsReport, WEEKDAY_NAMES};
use crate::summary::Summary;
use crate::time::EventTime;

#[cfg(test)]
mod golden_tests;

/// Configuration options for report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Document title.
    pub title: String,
    /// Date for the "Prepared ..." line; omitted when `None`.
    pub prepared_on: Option<NaiveDate>,
    /// Maximum rows in the long-meetings table.
    pub max_table_rows: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Calendar Audit Summary".to_string(),
            prepared_on: None,
            max_table_rows: 20,
        }
    }
}

impl ReportOptions {
    /// Builder method to set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder method to set the prepared-on date.
    pub fn with_prepared_on(mut self, date: NaiveDate) -> Self {
        self.prepared_on = Some(date);
        self
    }
}

/// Renders the full Markdown report.
pub fn render_markdown(
    metrics: &MetricsReport,
    summary: &Summary,
    options: &ReportOptions,
) -> String {
    let mut out = String::new();

    line(&mut out, &format!("# {}", options.title));
    blank(&mut out);
    if let Some(date) = options.prepared_on {
        line(&mut out, &format!("*Prepared {}*", date.format("%B %d, %Y")));
        blank(&mut out);
    }
    line(&mut out, "---");
    blank(&mut out);
    line(&mut out, "## Overview");
    blank(&mut out);
    line(&mut out, &summary.overview);
    blank(&mut out);

    if metrics.is_empty() {
        line(&mut out, "_No data: zero meetings matched the current filters._");
        blank(&mut out);
    } else {
        render_tables(&mut out, metrics, options);
        render_lists(&mut out, summary);
    }

    line(&mut out, "---");
    blank(&mut out);
    line(&mut out, &summary.closing);

    out
}

fn render_tables(out: &mut String, metrics: &MetricsReport, options: &ReportOptions) {
    line(out, "## Key Metrics");
    blank(out);
    line(out, "| Metric | Value |");
    line(out, "| --- | --- |");
    line(
        out,
        &format!("| Total meeting hours | {:.1} |", metrics.total_hours),
    );
    line(
        out,
        &format!("| Total meetings | {} |", metrics.total_meetings),
    );
    line(
        out,
        &format!("| Average duration | {:.0}m |", metrics.avg_duration_minutes),
    );
    line(
        out,
        &format!("| Recurring share | {:.1}% |", metrics.recurring_percent),
    );
    blank(out);

    line(out, "## Meeting Load by Weekday");
    blank(out);
    line(out, "| Day | Hours |");
    line(out, "| --- | --- |");
    for (name, minutes) in WEEKDAY_NAMES.iter().zip(metrics.by_weekday.iter()) {
        line(out, &format!("| {} | {:.1} |", name, *minutes as f64 / 60.0));
    }
    blank(out);

    line(out, "## Duration Distribution");
    blank(out);
    line(out, "| Duration | Meetings |");
    line(out, "| --- | --- |");
    for (label, count) in metrics.duration_distribution.labeled() {
        line(out, &format!("| {label} | {count} |"));
    }
    blank(out);

    line(out, "## Top Meetings by Time");
    blank(out);
    line(out, "| Meeting | Start | Duration (min) | Organizer |");
    line(out, "| --- | --- | --- | --- |");
    for slot in &metrics.top_meetings {
        line(
            out,
            &format!(
                "| {} | {} | {} | {} |",
                cell(&slot.subject),
                format_event_time(&slot.start),
                slot.duration_minutes,
                organizer_cell(&slot.organizer),
            ),
        );
    }
    blank(out);

    line(out, "## Top Subjects");
    blank(out);
    line(out, "| Subject | Occurrences | Total Hours | Avg (min) |");
    line(out, "| --- | --- | --- | --- |");
    for load in &metrics.top_subjects {
        line(
            out,
            &format!(
                "| {} | {} | {:.1} | {:.0} |",
                cell(&load.subject),
                load.occurrences,
                load.total_minutes as f64 / 60.0,
                load.avg_minutes,
            ),
        );
    }
    blank(out);

    line(out, "## Top Organizers");
    blank(out);
    if metrics.top_organizers.is_empty() {
        line(out, "_No organizer information in this export._");
    } else {
        line(out, "| Organizer | Meetings | Total Hours |");
        line(out, "| --- | --- | --- |");
        for load in &metrics.top_organizers {
            line(
                out,
                &format!(
                    "| {} | {} | {:.1} |",
                    cell(&load.organizer),
                    load.meetings,
                    load.total_minutes as f64 / 60.0,
                ),
            );
        }
    }
    blank(out);

    line(out, "## Long Meetings");
    blank(out);
    if metrics.long_meetings.is_empty() {
        line(out, "_No meetings over the long-meeting threshold._");
    } else {
        line(out, "| Meeting | Date | Duration (min) | Organizer |");
        line(out, "| --- | --- | --- | --- |");
        for slot in metrics.long_meetings.iter().take(options.max_table_rows) {
            line(
                out,
                &format!(
                    "| {} | {} | {} | {} |",
                    cell(&slot.subject),
                    slot.start.date().format("%Y-%m-%d"),
                    slot.duration_minutes,
                    organizer_cell(&slot.organizer),
                ),
            );
        }
    }
    blank(out);
}

fn render_lists(out: &mut String, summary: &Summary) {
    line(out, "## Key Observations");
    blank(out);
    if summary.insights.is_empty() {
        line(out, "_No notable patterns detected._");
    } else {
        for insight in &summary.insights {
            line(out, &format!("- {insight}"));
        }
    }
    blank(out);

    line(out, "## Considerations");
    blank(out);
    if summary.actions.is_empty() {
        line(out, "_No specific adjustments suggested._");
    } else {
        for action in &summary.actions {
            line(out, &format!("- {action}"));
        }
    }
    blank(out);
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn blank(out: &mut String) {
    out.push('\n');
}

/// Formats an event time for the tables: date plus UTC time for timed
/// events, date only for all-day ones.
fn format_event_time(time: &EventTime) -> String {
    match time {
        EventTime::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        EventTime::AllDay(date) => date.format("%Y-%m-%d").to_string(),
    }
}

/// Sanitizes free text for a Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', "\\|")
}

fn organizer_cell(organizer: &str) -> String {
    if organizer.trim().is_empty() {
        "-".to_string()
    } else {
        cell(organizer)
    }
}
