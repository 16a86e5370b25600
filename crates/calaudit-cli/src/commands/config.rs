//! Configuration commands.

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &CliConfig) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", CliConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &CliConfig) -> CliResult<()> {
    if config.filters.min_duration_minutes < 0 {
        return Err(CliError::Config(
            "filters.min_duration_minutes must not be negative".to_string(),
        ));
    }
    if config.metrics.top_n == 0 {
        return Err(CliError::Config(
            "metrics.top_n must be at least 1".to_string(),
        ));
    }
    if config.report.title.trim().is_empty() {
        return Err(CliError::Config(
            "report.title must not be empty".to_string(),
        ));
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> CliResult<()> {
    let config_path = CliConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}
