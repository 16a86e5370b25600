//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use calaudit_core::filter::FilterConfig;
use calaudit_core::metrics::MetricsConfig;
use calaudit_parsers::SourceOverride;

use crate::config::CliConfig;

/// calaudit - Audit a calendar export: meeting-load metrics and an executive summary
#[derive(Debug, Parser)]
#[command(name = "calaudit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Calendar export to analyze (.csv or .ics)
    pub input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short, env = "CALAUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Parsing flags ---
    /// Override CSV source detection (ignored for ICS input)
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    // --- Filter flags ---
    /// Keep all-day events in the analysis
    #[arg(long)]
    pub include_all_day: bool,

    /// Exclude meetings shorter than this many minutes
    #[arg(long, allow_negative_numbers = true)]
    pub min_duration: Option<i64>,

    /// Exclude meetings whose subject contains this keyword (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub exclude_keyword: Vec<String>,

    // --- Metrics flags ---
    /// Number of entries in the ranked tables
    #[arg(long)]
    pub top: Option<usize>,

    /// Long-meeting threshold in minutes
    #[arg(long)]
    pub long_threshold: Option<i64>,

    // --- Output flags ---
    /// Output machine-readable JSON instead of Markdown
    #[arg(long)]
    pub json: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Omit the "Prepared ..." date line so repeated runs are byte-identical
    #[arg(long)]
    pub no_date_line: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Builds the filter configuration: config file values overridden by
    /// flags.
    pub fn filter_config(&self, base: &CliConfig) -> FilterConfig {
        let mut keywords = base.filters.exclude_keywords.clone();
        keywords.extend(self.exclude_keyword.iter().cloned());

        FilterConfig {
            exclude_all_day: if self.include_all_day {
                false
            } else {
                base.filters.exclude_all_day
            },
            min_duration_minutes: self
                .min_duration
                .unwrap_or(base.filters.min_duration_minutes),
            excluded_keywords: keywords,
        }
    }

    /// Builds the metrics configuration: config file values overridden by
    /// flags.
    pub fn metrics_config(&self, base: &CliConfig) -> MetricsConfig {
        MetricsConfig {
            top_n: self.top.unwrap_or(base.metrics.top_n),
            long_meeting_minutes: self
                .long_threshold
                .unwrap_or(base.metrics.long_meeting_minutes),
        }
    }

    /// The parser override selected on the command line, if any.
    pub fn source_override(&self) -> Option<SourceOverride> {
        self.source.map(SourceArg::to_override)
    }
}

/// CSV source override values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Outlook export column schema.
    Outlook,
    /// Google Calendar export column schema.
    Google,
}

impl SourceArg {
    /// Converts to the parser's override type.
    pub fn to_override(self) -> SourceOverride {
        match self {
            Self::Outlook => SourceOverride::Outlook,
            Self::Google => SourceOverride::Google,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Dump,
    /// Validate the configuration
    Validate,
    /// Show the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["calaudit", "export.csv"]).unwrap();
        assert_eq!(cli.input.as_deref(), Some(std::path::Path::new("export.csv")));
        assert!(!cli.json);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_filter_flags() {
        let cli = Cli::try_parse_from([
            "calaudit",
            "export.ics",
            "--include-all-day",
            "--min-duration",
            "30",
            "--exclude-keyword",
            "lunch",
            "--exclude-keyword",
            "blocked",
        ])
        .unwrap();

        let filter = cli.filter_config(&CliConfig::default());
        assert!(!filter.exclude_all_day);
        assert_eq!(filter.min_duration_minutes, 30);
        assert_eq!(filter.excluded_keywords, vec!["lunch", "blocked"]);
    }

    #[test]
    fn flags_override_config_file() {
        let cli = Cli::try_parse_from(["calaudit", "export.csv", "--top", "3"]).unwrap();
        let mut base = CliConfig::default();
        base.metrics.top_n = 7;
        base.metrics.long_meeting_minutes = 45;

        let metrics = cli.metrics_config(&base);
        assert_eq!(metrics.top_n, 3);
        assert_eq!(metrics.long_meeting_minutes, 45);
    }

    #[test]
    fn config_defaults_used_without_flags() {
        let cli = Cli::try_parse_from(["calaudit", "export.csv"]).unwrap();
        let filter = cli.filter_config(&CliConfig::default());
        assert!(filter.exclude_all_day);
        assert_eq!(filter.min_duration_minutes, 0);
        assert!(filter.excluded_keywords.is_empty());
    }

    #[test]
    fn parses_source_override() {
        let cli = Cli::try_parse_from(["calaudit", "export.csv", "--source", "outlook"]).unwrap();
        assert_eq!(cli.source_override(), Some(SourceOverride::Outlook));

        let cli = Cli::try_parse_from(["calaudit", "export.csv", "--source", "google"]).unwrap();
        assert_eq!(cli.source_override(), Some(SourceOverride::Google));
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::try_parse_from(["calaudit", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        ));
    }
}
