//! RRULE occurrence expansion.
//!
//! An open-ended recurrence rule would otherwise produce unbounded output,
//! so expansion is bounded by an explicit [`ExpansionPolicy`]: a half-open
//! time window plus a per-component instance cap, whichever is hit first.
//! The policy's reference instant is supplied by the caller rather than read
//! from a clock, which keeps parsing deterministic.

use std::str::FromStr;

use calaudit_core::time::TimeWindow;
use chrono::{DateTime, Duration, Utc};
use rrule::RRuleSet;

/// Upper bound on raw rule iterations, guarding against pathological rules
/// (e.g. minutely recurrence far before the window).
const MAX_SCAN: usize = 100_000;

/// Bounds for recurrence expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionPolicy {
    /// Occurrences outside this window are discarded.
    pub window: TimeWindow,
    /// At most this many occurrences are produced per component.
    pub max_instances: usize,
}

impl ExpansionPolicy {
    /// Default per-component occurrence cap.
    pub const DEFAULT_MAX_INSTANCES: usize = 500;
    /// Default window radius: two years either side of the reference instant.
    pub const DEFAULT_WINDOW_DAYS: i64 = 730;

    /// The default policy around a caller-supplied reference instant.
    pub fn around(reference: DateTime<Utc>) -> Self {
        Self {
            window: TimeWindow::around(reference, Duration::days(Self::DEFAULT_WINDOW_DAYS)),
            max_instances: Self::DEFAULT_MAX_INSTANCES,
        }
    }

    /// Builder method to set the instance cap.
    pub fn with_max_instances(mut self, max_instances: usize) -> Self {
        self.max_instances = max_instances;
        self
    }
}

/// The result of expanding one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Occurrence start instants within the policy window, in order.
    pub occurrences: Vec<DateTime<Utc>>,
    /// Whether the instance cap or scan guard truncated the expansion.
    pub capped: bool,
}

/// Expands a recurrence rule into occurrence start instants.
///
/// `rule` is the RRULE property value, with or without the `RRULE:` prefix.
/// Returns an error string when the rule does not parse; callers degrade to
/// a single occurrence and record a warning.
pub fn expand_occurrences(
    rule: &str,
    dtstart: DateTime<Utc>,
    policy: &ExpansionPolicy,
) -> Result<Expansion, String> {
    let rule_part = sanitize_rule(rule);
    let input = format!(
        "DTSTART:{}\nRRULE:{}",
        dtstart.format("%Y%m%dT%H%M%SZ"),
        rule_part
    );
    let set = RRuleSet::from_str(&input).map_err(|e| e.to_string())?;

    let mut occurrences = Vec::new();
    let mut capped = false;
    for (scanned, occurrence) in set.into_iter().enumerate() {
        let utc = occurrence.to_utc();
        if utc >= policy.window.end {
            break;
        }
        if occurrences.len() >= policy.max_instances || scanned >= MAX_SCAN {
            capped = true;
            break;
        }
        if policy.window.contains(utc) {
            occurrences.push(utc);
        }
    }

    Ok(Expansion { occurrences, capped })
}

/// Normalizes a rule string for the parser.
///
/// Strips a leading `RRULE:` prefix and upgrades a date-only `UNTIL` value
/// to end-of-day UTC, since `UNTIL` must match the type of `DTSTART` and
/// the synthesized `DTSTART` is always a datetime.
fn sanitize_rule(rule: &str) -> String {
    let trimmed = rule.trim();
    let mut rule_part = match trimmed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("RRULE:") => trimmed[6..].to_string(),
        _ => trimmed.to_string(),
    };

    if let Some(idx) = rule_part.find("UNTIL=") {
        let value_start = idx + 6;
        let value_end = rule_part[value_start..]
            .find(';')
            .map(|i| value_start + i)
            .unwrap_or(rule_part.len());
        let value = &rule_part[value_start..value_end];
        if value.len() == 8 && !value.contains('T') {
            let upgraded = format!("{value}T235959Z");
            rule_part.replace_range(value_start..value_end, &upgraded);
        }
    }

    rule_part
}
