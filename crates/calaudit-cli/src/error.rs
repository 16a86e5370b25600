//! CLI error types.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug)]
pub enum CliError {
    /// The invocation was incomplete or contradictory.
    Usage(String),
    /// Configuration error.
    Config(String),
    /// Parse error from the calendar readers.
    Parse(calaudit_parsers::ParseError),
    /// Invalid filter configuration.
    Filter(calaudit_core::FilterError),
    /// IO error.
    Io(std::io::Error),
    /// Failed to serialize output.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "usage error: {}", msg),
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Parse(err) => write!(f, "parse error: {}", err),
            Self::Filter(err) => write!(f, "filter error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Output(msg) => write!(f, "output error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Filter(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<calaudit_parsers::ParseError> for CliError {
    fn from(err: calaudit_parsers::ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<calaudit_core::FilterError> for CliError {
    fn from(err: calaudit_core::FilterError) -> Self {
        Self::Filter(err)
    }
}
