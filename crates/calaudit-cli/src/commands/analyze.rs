//! The analyze command: parse, filter, compute, summarize, render.

use chrono::{Local, Utc};
use serde::Serialize;
use tracing::info;

use calaudit_core::filter::apply_filters;
use calaudit_core::metrics::{MetricsReport, compute_metrics};
use calaudit_core::report::{ReportOptions, render_markdown};
use calaudit_core::summary::{Summary, generate_summary};
use calaudit_parsers::{ExpansionPolicy, Format, ParseWarning, parse_calendar};

use crate::cli::Cli;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// JSON output shape for `--json`.
#[derive(Debug, Serialize)]
struct AnalysisOutput<'a> {
    format: Format,
    warnings: &'a [ParseWarning],
    skipped: usize,
    metrics: &'a MetricsReport,
    summary: &'a Summary,
}

/// Runs one full analysis over the input file.
pub fn run(cli: &Cli, config: &CliConfig) -> CliResult<()> {
    let input = cli.input.as_ref().ok_or_else(|| {
        CliError::Usage("missing input file (expected a .csv or .ics export)".to_string())
    })?;
    let bytes = std::fs::read(input)?;
    let filename = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    // Recurrence expansion is bounded around the moment of analysis.
    let policy = ExpansionPolicy::around(Utc::now());
    let outcome = parse_calendar(&bytes, &filename, cli.source_override(), &policy)?;

    let filter = cli.filter_config(config);
    filter.validate()?;
    let filtered = apply_filters(&outcome.records, &filter);
    info!(
        parsed = outcome.records.len(),
        filtered = filtered.len(),
        "applied filters"
    );

    let metrics = compute_metrics(&filtered, &cli.metrics_config(config));
    let summary = generate_summary(&metrics);

    let rendered = if cli.json {
        let output = AnalysisOutput {
            format: outcome.format,
            warnings: &outcome.warnings,
            skipped: outcome.skipped,
            metrics: &metrics,
            summary: &summary,
        };
        let mut text = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::Output(e.to_string()))?;
        text.push('\n');
        text
    } else {
        let mut options = ReportOptions::default().with_title(config.report.title.clone());
        if config.report.date_line && !cli.no_date_line {
            options = options.with_prepared_on(Local::now().date_naive());
        }
        render_markdown(&metrics, &summary, &options)
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    const OUTLOOK_CSV: &str = "\
Subject,Start Date,Start Time,End Date,End Time,All day event,Organizer,Required Attendees
Team Standup,03/02/2026,9:00:00 AM,03/02/2026,9:15:00 AM,False,alice@example.com,team
Planning,03/02/2026,10:00:00 AM,03/02/2026,11:30:00 AM,False,alice@example.com,team
Company Holiday,03/03/2026,,03/04/2026,,True,,
";

    fn write_sample(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("calendar.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(OUTLOOK_CSV.as_bytes()).unwrap();
        path
    }

    #[test]
    fn writes_markdown_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(&dir);
        let output = dir.path().join("report.md");

        let cli = Cli::try_parse_from([
            "calaudit",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--no-date-line",
        ])
        .unwrap();

        run(&cli, &CliConfig::default()).unwrap();

        let report = std::fs::read_to_string(&output).unwrap();
        assert!(report.starts_with("# Calendar Audit Summary"));
        assert!(report.contains("| Total meetings | 2 |"));
        assert!(report.contains("## Key Observations"));
        // The all-day holiday is filtered out by default.
        assert!(!report.contains("Company Holiday"));
    }

    #[test]
    fn writes_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(&dir);
        let output = dir.path().join("report.json");

        let cli = Cli::try_parse_from([
            "calaudit",
            input.to_str().unwrap(),
            "--json",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();

        run(&cli, &CliConfig::default()).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["format"], "outlook_csv");
        assert_eq!(value["metrics"]["total_meetings"], 2);
        assert!(value["summary"]["overview"].is_string());
    }

    #[test]
    fn missing_input_is_usage_error() {
        let cli = Cli::try_parse_from(["calaudit"]).unwrap();
        let err = run(&cli, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn negative_min_duration_is_filter_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(&dir);

        let cli = Cli::try_parse_from([
            "calaudit",
            input.to_str().unwrap(),
            "--min-duration",
            "-5",
        ])
        .unwrap();

        let err = run(&cli, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Filter(_)));
    }

    #[test]
    fn unreadable_input_is_io_error() {
        let cli = Cli::try_parse_from(["calaudit", "/nonexistent/calendar.csv"]).unwrap();
        let err = run(&cli, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn min_duration_flag_filters_short_meetings() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(&dir);
        let output = dir.path().join("report.md");

        let cli = Cli::try_parse_from([
            "calaudit",
            input.to_str().unwrap(),
            "--min-duration",
            "30",
            "--output",
            output.to_str().unwrap(),
            "--no-date-line",
        ])
        .unwrap();

        run(&cli, &CliConfig::default()).unwrap();

        let report = std::fs::read_to_string(&output).unwrap();
        assert!(report.contains("| Total meetings | 1 |"));
        assert!(!report.contains("Team Standup"));
    }
}
