//! CLI error type.

use std::fmt;

use elevate::api::ServerError;
use elevate::config::ConfigError;
use elevate::logging::LoggingError;
use elevate::provider::ProviderError;

/// Errors surfaced to the user by the `elevate` binary.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded, parsed or saved.
    Config(String),
    /// The tracing subscriber could not be installed.
    Logging(LoggingError),
    /// The tile provider could not be constructed.
    Provider(ProviderError),
    /// The HTTP server failed to bind or serve.
    Server(ServerError),
    /// The async runtime could not be started.
    Runtime(String),
    /// The Ctrl+C handler could not be installed.
    Signal(String),
    /// A `LAT,LON` argument could not be parsed.
    InvalidCoordinate { input: String, reason: String },
    /// A query completed with a report-level error.
    QueryFailed(String),
    /// The report could not be written to stdout.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Provider(e) => write!(f, "Failed to create tile provider: {}", e),
            CliError::Server(e) => write!(f, "Server error: {}", e),
            CliError::Runtime(msg) => write!(f, "Failed to start async runtime: {}", msg),
            CliError::Signal(msg) => write!(f, "Failed to set signal handler: {}", msg),
            CliError::InvalidCoordinate { input, reason } => {
                write!(f, "Invalid coordinate '{}': {}", input, reason)
            }
            CliError::QueryFailed(msg) => write!(f, "Query failed: {}", msg),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Logging(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Server(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<ServerError> for CliError {
    fn from(e: ServerError) -> Self {
        CliError::Server(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<ctrlc::Error> for CliError {
    fn from(e: ctrlc::Error) -> Self {
        CliError::Signal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_error_is_not_config_error() {
        let err = CliError::from(ctrlc::Error::MultipleHandlers);
        assert!(matches!(err, CliError::Signal(_)));
        assert!(err.to_string().starts_with("Failed to set signal handler"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err = CliError::from(elevate::config::ConfigError::UnknownKey("x.y".to_string()));
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("x.y"));
    }
}
