//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calaudit/config.toml` by default. Command-line flags override
//! file values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the calaudit CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Debug mode.
    pub debug: bool,

    /// Filter settings.
    #[serde(default)]
    pub filters: FilterSettings,

    /// Metrics settings.
    #[serde(default)]
    pub metrics: MetricsSettings,

    /// Report settings.
    #[serde(default)]
    pub report: ReportSettings,
}

/// Filter settings applied before metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Drop all-day events.
    pub exclude_all_day: bool,

    /// Drop events shorter than this many minutes.
    pub min_duration_minutes: i64,

    /// Drop events whose subject contains one of these keywords.
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            exclude_all_day: true,
            min_duration_minutes: 0,
            exclude_keywords: Vec::new(),
        }
    }
}

/// Metrics engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Number of entries in the ranked tables.
    pub top_n: usize,

    /// Long-meeting threshold in minutes.
    pub long_meeting_minutes: i64,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            long_meeting_minutes: 60,
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Document title.
    pub title: String,

    /// Include the "Prepared ..." date line.
    pub date_line: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Calendar Audit Summary".to_string(),
            date_line: true,
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("failed to read config: {}", e))?;
            toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calaudit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = CliConfig::default();
        assert!(!config.debug);
        assert!(config.filters.exclude_all_day);
        assert_eq!(config.filters.min_duration_minutes, 0);
        assert_eq!(config.metrics.top_n, 10);
        assert_eq!(config.metrics.long_meeting_minutes, 60);
        assert_eq!(config.report.title, "Calendar Audit Summary");
        assert!(config.report.date_line);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "debug = true\n\n\
             [filters]\n\
             exclude_all_day = false\n\
             min_duration_minutes = 15\n\
             exclude_keywords = [\"lunch\"]\n\n\
             [metrics]\n\
             top_n = 5\n\n\
             [report]\n\
             title = \"Exec Calendar Review\"\n\
             date_line = false"
        )
        .unwrap();

        let config = CliConfig::load_from(&file.path().to_path_buf()).unwrap();
        assert!(config.debug);
        assert!(!config.filters.exclude_all_day);
        assert_eq!(config.filters.min_duration_minutes, 15);
        assert_eq!(config.filters.exclude_keywords, vec!["lunch"]);
        assert_eq!(config.metrics.top_n, 5);
        // Unspecified values keep their defaults.
        assert_eq!(config.metrics.long_meeting_minutes, 60);
        assert_eq!(config.report.title, "Exec Calendar Review");
        assert!(!config.report.date_line);
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[filters]\nmin_duration_minutes = 10").unwrap();

        let config = CliConfig::load_from(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.filters.min_duration_minutes, 10);
        assert!(config.filters.exclude_all_day);
        assert_eq!(config.metrics.top_n, 10);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = CliConfig::load_from(&PathBuf::from("/nonexistent/calaudit.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn roundtrips_through_toml() {
        let config = CliConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: CliConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.metrics.top_n, config.metrics.top_n);
        assert_eq!(parsed.report.title, config.report.title);
    }

    #[test]
    fn default_path_under_calaudit_dir() {
        let path = CliConfig::default_path();
        assert!(path.to_string_lossy().contains("calaudit"));
        assert!(path.ends_with("config.toml"));
    }
}
