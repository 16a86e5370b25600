//! Core types: time, meeting records, filters, metrics, summary, report

pub mod filter;
pub mod metrics;
pub mod record;
pub mod report;
pub mod summary;
pub mod time;
pub mod tracing;

pub use filter::{FilterConfig, FilterError, apply_filters};
pub use metrics::{
    DurationDistribution, MeetingSlot, MetricsConfig, MetricsReport, OrganizerLoad, Patterns,
    SubjectLoad, compute_metrics,
};
pub use record::MeetingRecord;
pub use report::{ReportOptions, render_markdown};
pub use summary::{RuleKind, Summary, SummaryRule, generate_summary, rule_table};
pub use time::{EventTime, TimeWindow};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
