//! Record filtering.
//!
//! The filter stage selects the subset of parsed records that the metrics
//! engine should see. Records are never mutated and order is preserved, so
//! applying the same configuration twice yields the same result as once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::MeetingRecord;

/// Errors for invalid filter configurations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The minimum duration threshold is negative.
    #[error("minimum duration must not be negative, got {0}")]
    NegativeMinDuration(i64),
}

/// User-chosen exclusion rules applied to parsed records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Drop all-day events (holidays, PTO blocks).
    pub exclude_all_day: bool,
    /// Drop events shorter than this many minutes.
    pub min_duration_minutes: i64,
    /// Drop events whose subject contains any of these substrings
    /// (case-insensitive).
    pub excluded_keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_all_day: true,
            min_duration_minutes: 0,
            excluded_keywords: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Builder method to set the all-day exclusion.
    pub fn with_exclude_all_day(mut self, exclude: bool) -> Self {
        self.exclude_all_day = exclude;
        self
    }

    /// Builder method to set the minimum duration threshold.
    pub fn with_min_duration(mut self, minutes: i64) -> Self {
        self.min_duration_minutes = minutes;
        self
    }

    /// Builder method to set the keyword blocklist.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.excluded_keywords = keywords;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::NegativeMinDuration`] when the duration
    /// threshold is below zero.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.min_duration_minutes < 0 {
            return Err(FilterError::NegativeMinDuration(self.min_duration_minutes));
        }
        Ok(())
    }

    /// Returns `true` if the record survives this filter.
    pub fn matches(&self, record: &MeetingRecord) -> bool {
        if self.exclude_all_day && record.is_all_day {
            return false;
        }
        if record.duration_minutes < self.min_duration_minutes {
            return false;
        }
        if !self.excluded_keywords.is_empty() {
            let subject = record.subject.to_lowercase();
            for keyword in &self.excluded_keywords {
                let keyword = keyword.trim();
                if !keyword.is_empty() && subject.contains(&keyword.to_lowercase()) {
                    return false;
                }
            }
        }
        true
    }
}

/// Returns the records satisfying `config`, in their original order.
pub fn apply_filters(records: &[MeetingRecord], config: &FilterConfig) -> Vec<MeetingRecord> {
    records
        .iter()
        .filter(|r| config.matches(r))
        .cloned()
        .collect()
}
