//! Executive summary generation.
//!
//! The summary is produced by a fixed, ordered table of rules. Each rule is a
//! pure function from the metrics report to an optional line of text; rules
//! fire in table order, and the insight and action lists are each capped.
//! Identical metrics always yield identical text: there is no clock access
//! and no randomness anywhere in this module.

use serde::{Deserialize, Serialize};

use crate::metrics::MetricsReport;

/// Maximum number of insights and of recommended actions in a summary.
pub const MAX_ITEMS_PER_KIND: usize = 6;

/// Whether a rule produces an observation or a suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A data-driven observation about meeting patterns.
    Insight,
    /// A suggested consideration, framed as an option rather than a directive.
    Action,
}

/// One entry in the summary rule table.
pub struct SummaryRule {
    /// Stable rule identifier, useful for auditing which rules fired.
    pub name: &'static str,
    /// Whether the rule emits an insight or an action.
    pub kind: RuleKind,
    /// Returns the rendered text when the rule applies.
    pub apply: fn(&MetricsReport) -> Option<String>,
}

/// The generated executive summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Two-to-three sentence overview of the analyzed period.
    pub overview: String,
    /// Observations, in rule priority order.
    pub insights: Vec<String>,
    /// Suggested considerations, in rule priority order.
    pub actions: Vec<String>,
    /// Closing paragraph.
    pub closing: String,
}

/// The fixed rule table, in priority order.
///
/// Insights first, then actions; `generate_summary` partitions by kind, so
/// the relative order within each kind is what matters.
pub fn rule_table() -> &'static [SummaryRule] {
    RULES
}

static RULES: &[SummaryRule] = &[
    SummaryRule {
        name: "daily_load",
        kind: RuleKind::Insight,
        apply: insight_daily_load,
    },
    SummaryRule {
        name: "recurring_share",
        kind: RuleKind::Insight,
        apply: insight_recurring_share,
    },
    SummaryRule {
        name: "busiest_day",
        kind: RuleKind::Insight,
        apply: insight_busiest_day,
    },
    SummaryRule {
        name: "long_meetings",
        kind: RuleKind::Insight,
        apply: insight_long_meetings,
    },
    SummaryRule {
        name: "top_subject",
        kind: RuleKind::Insight,
        apply: insight_top_subject,
    },
    SummaryRule {
        name: "common_duration",
        kind: RuleKind::Insight,
        apply: insight_common_duration,
    },
    SummaryRule {
        name: "meeting_length_default",
        kind: RuleKind::Action,
        apply: action_meeting_length_default,
    },
    SummaryRule {
        name: "recurring_review",
        kind: RuleKind::Action,
        apply: action_recurring_review,
    },
    SummaryRule {
        name: "long_prereads",
        kind: RuleKind::Action,
        apply: action_long_prereads,
    },
    SummaryRule {
        name: "cadence_revisit",
        kind: RuleKind::Action,
        apply: action_cadence_revisit,
    },
    SummaryRule {
        name: "focus_block",
        kind: RuleKind::Action,
        apply: action_focus_block,
    },
    SummaryRule {
        name: "delegate_density",
        kind: RuleKind::Action,
        apply: action_delegate_density,
    },
];

fn insight_daily_load(m: &MetricsReport) -> Option<String> {
    if m.patterns.active_days == 0 {
        return None;
    }
    Some(format!(
        "The calendar reflects an average of {:.1} hours in meetings per day across the analyzed period.",
        m.patterns.avg_hours_per_day
    ))
}

fn insight_recurring_share(m: &MetricsReport) -> Option<String> {
    if m.recurring_percent <= 30.0 {
        return None;
    }
    Some(format!(
        "Approximately {:.1}% of meeting time appears to be allocated to recurring commitments.",
        m.recurring_percent
    ))
}

fn insight_busiest_day(m: &MetricsReport) -> Option<String> {
    let day = m.patterns.busiest_weekday.as_ref()?;
    Some(format!(
        "{} currently carries the highest meeting load at {:.1} hours.",
        day,
        m.patterns.busiest_weekday_minutes as f64 / 60.0
    ))
}

fn insight_long_meetings(m: &MetricsReport) -> Option<String> {
    if m.patterns.long_meetings < 3 {
        return None;
    }
    Some(format!(
        "{} meetings exceed 60 minutes, representing {:.1} hours total.",
        m.patterns.long_meetings, m.patterns.long_meeting_hours
    ))
}

fn insight_top_subject(m: &MetricsReport) -> Option<String> {
    let top = m.top_subjects.first()?;
    if top.occurrences < 2 {
        return None;
    }
    Some(format!(
        "'{}' accounts for {:.1} hours across {} occurrences.",
        truncate(&top.subject, 35),
        top.total_minutes as f64 / 60.0,
        top.occurrences
    ))
}

fn insight_common_duration(m: &MetricsReport) -> Option<String> {
    let duration = m.patterns.most_common_duration?;
    Some(format!(
        "The most frequently scheduled meeting length is {duration} minutes."
    ))
}

fn action_meeting_length_default(m: &MetricsReport) -> Option<String> {
    match m.patterns.most_common_duration? {
        60 => Some(
            "You may want to consider whether 50-minute defaults would create helpful buffer \
             time between sessions."
                .to_string(),
        ),
        30 => Some(
            "One potential adjustment is shifting to 25-minute meetings where appropriate, \
             allowing brief transitions between calls."
                .to_string(),
        ),
        _ => None,
    }
}

fn action_recurring_review(m: &MetricsReport) -> Option<String> {
    if m.recurring_percent <= 40.0 {
        return None;
    }
    Some(
        "Based on the recurring meeting volume, a periodic review of standing commitments may \
         surface opportunities to consolidate or adjust frequency."
            .to_string(),
    )
}

fn action_long_prereads(m: &MetricsReport) -> Option<String> {
    if m.patterns.long_meetings < 3 {
        return None;
    }
    Some(
        "For longer sessions, there may be value in exploring whether pre-reads or async \
         updates could reduce required meeting time."
            .to_string(),
    )
}

fn action_cadence_revisit(m: &MetricsReport) -> Option<String> {
    let top = m.top_subjects.first()?;
    if top.occurrences < 4 {
        return None;
    }
    Some(format!(
        "The frequency of '{}' could be worth revisiting to confirm the current cadence still \
         aligns with priorities.",
        truncate(&top.subject, 30)
    ))
}

fn action_focus_block(m: &MetricsReport) -> Option<String> {
    let day = m.patterns.busiest_weekday.as_ref()?;
    if m.patterns.busiest_weekday_minutes as f64 / 60.0 <= 5.0 {
        return None;
    }
    Some(format!(
        "Given the concentration of meetings on {day}, protecting a focus block that day may \
         be beneficial."
    ))
}

fn action_delegate_density(m: &MetricsReport) -> Option<String> {
    if m.patterns.avg_meetings_per_day <= 5.0 {
        return None;
    }
    Some(
        "With the current meeting density, there may be opportunities to identify sessions \
         where a delegate or summary could serve as an alternative."
            .to_string(),
    )
}

/// Truncates on a character boundary, without an ellipsis.
fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn overview(m: &MetricsReport) -> String {
    if m.is_empty() {
        return "No meeting data was available for this period; the calendar contained no \
                meetings matching the current filters."
            .to_string();
    }

    let mut sentences = vec![format!(
        "This analysis covers {} meetings totaling {:.1} hours, with an average duration of \
         {:.0} minutes.",
        m.total_meetings, m.total_hours, m.avg_duration_minutes
    )];

    let load = m.patterns.avg_hours_per_day;
    sentences.push(
        if load > 5.0 {
            "The current pattern reflects a meeting-intensive schedule."
        } else if load > 3.0 {
            "The calendar shows a moderate level of meeting activity."
        } else {
            "Meeting load appears balanced relative to available time."
        }
        .to_string(),
    );

    if m.recurring_percent > 40.0 {
        sentences.push(format!(
            "Recurring meetings represent a notable portion ({:.1}%) of total time.",
            m.recurring_percent
        ));
    }

    sentences.join(" ")
}

fn closing(m: &MetricsReport) -> String {
    if m.is_empty() {
        return "Once a calendar export with meeting data is loaded, observations and \
                considerations will appear here."
            .to_string();
    }

    let mut sentences = vec![
        "These observations are intended to support informed decisions about calendar \
         management."
            .to_string(),
    ];
    sentences.push(
        if m.patterns.avg_hours_per_day > 4.0 {
            "Small adjustments to meeting frequency or duration can often create meaningful \
             capacity for focused work."
        } else {
            "The current structure provides a foundation that can be refined as priorities \
             evolve."
        }
        .to_string(),
    );
    sentences
        .push("Happy to discuss any of these patterns in more detail or explore specific adjustments.".to_string());

    sentences.join(" ")
}

/// Generates the executive summary for a metrics report.
pub fn generate_summary(metrics: &MetricsReport) -> Summary {
    let mut insights = Vec::new();
    let mut actions = Vec::new();

    for rule in rule_table() {
        let bucket = match rule.kind {
            RuleKind::Insight => &mut insights,
            RuleKind::Action => &mut actions,
        };
        if bucket.len() >= MAX_ITEMS_PER_KIND {
            continue;
        }
        if let Some(text) = (rule.apply)(metrics) {
            bucket.push(text);
        }
    }

    Summary {
        overview: overview(metrics),
        insights,
        actions,
        closing: closing(metrics),
    }
}
