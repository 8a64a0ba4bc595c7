//! Typed access to individual configuration settings by `section.key` name.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{invalid, normalize_address, parse_zoom, ConfigError, ConfigFile};
use crate::logging::LogFormat;

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ServerAddress,
    ElevationZoom,
    ElevationDeadlineMs,
    ElevationMaxConcurrency,
    ElevationCancelOnExpiry,
    ProviderBaseUrl,
    ProviderExtension,
    ProviderTimeoutSecs,
    LoggingLevel,
    LoggingFormat,
    LoggingFile,
}

const ALL_KEYS: [ConfigKey; 11] = [
    ConfigKey::ServerAddress,
    ConfigKey::ElevationZoom,
    ConfigKey::ElevationDeadlineMs,
    ConfigKey::ElevationMaxConcurrency,
    ConfigKey::ElevationCancelOnExpiry,
    ConfigKey::ProviderBaseUrl,
    ConfigKey::ProviderExtension,
    ConfigKey::ProviderTimeoutSecs,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingFormat,
    ConfigKey::LoggingFile,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ServerAddress => "server",
            ConfigKey::ElevationZoom
            | ConfigKey::ElevationDeadlineMs
            | ConfigKey::ElevationMaxConcurrency
            | ConfigKey::ElevationCancelOnExpiry => "elevation",
            ConfigKey::ProviderBaseUrl
            | ConfigKey::ProviderExtension
            | ConfigKey::ProviderTimeoutSecs => "provider",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFormat | ConfigKey::LoggingFile => {
                "logging"
            }
        }
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ServerAddress => "address",
            ConfigKey::ElevationZoom => "zoom",
            ConfigKey::ElevationDeadlineMs => "deadline_ms",
            ConfigKey::ElevationMaxConcurrency => "max_concurrency",
            ConfigKey::ElevationCancelOnExpiry => "cancel_on_expiry",
            ConfigKey::ProviderBaseUrl => "base_url",
            ConfigKey::ProviderExtension => "extension",
            ConfigKey::ProviderTimeoutSecs => "timeout_secs",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFormat => "format",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full dotted name, e.g. `elevation.zoom`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as text. Unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ServerAddress => config.server.address.clone(),
            ConfigKey::ElevationZoom => config.elevation.zoom.to_string(),
            ConfigKey::ElevationDeadlineMs => config.elevation.deadline.as_millis().to_string(),
            ConfigKey::ElevationMaxConcurrency => config
                .elevation
                .max_concurrency
                .map(|n| n.to_string())
                .unwrap_or_default(),
            ConfigKey::ElevationCancelOnExpiry => config.elevation.cancel_on_expiry.to_string(),
            ConfigKey::ProviderBaseUrl => config.provider.base_url.clone(),
            ConfigKey::ProviderExtension => config.provider.extension.clone(),
            ConfigKey::ProviderTimeoutSecs => config.provider.timeout.as_secs().to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFormat => config.logging.format.to_string(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parses and stores a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let name = self.name();
        let trimmed = value.trim();

        match self {
            ConfigKey::ServerAddress => {
                if trimmed.is_empty() {
                    return Err(invalid(&name, value, "address must not be empty"));
                }
                config.server.address = normalize_address(trimmed);
            }
            ConfigKey::ElevationZoom => {
                config.elevation.zoom = parse_zoom(&name, value)?;
            }
            ConfigKey::ElevationDeadlineMs => {
                let millis = parse_positive(&name, value)?;
                config.elevation.deadline = Duration::from_millis(millis);
            }
            ConfigKey::ElevationMaxConcurrency => {
                config.elevation.max_concurrency = if trimmed.is_empty() {
                    None
                } else {
                    Some(parse_positive(&name, value)? as usize)
                };
            }
            ConfigKey::ElevationCancelOnExpiry => {
                config.elevation.cancel_on_expiry = parse_bool(&name, value)?;
            }
            ConfigKey::ProviderBaseUrl => {
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(invalid(&name, value, "expected an http(s) URL"));
                }
                config.provider.base_url = trimmed.to_string();
            }
            ConfigKey::ProviderExtension => {
                if trimmed.is_empty() {
                    return Err(invalid(&name, value, "extension must not be empty"));
                }
                config.provider.extension = trimmed.to_string();
            }
            ConfigKey::ProviderTimeoutSecs => {
                let secs = parse_positive(&name, value)?;
                config.provider.timeout = Duration::from_secs(secs);
            }
            ConfigKey::LoggingLevel => {
                config.logging.level = if trimmed.is_empty() {
                    super::DEFAULT_LOG_LEVEL.to_string()
                } else {
                    trimmed.to_string()
                };
            }
            ConfigKey::LoggingFormat => {
                config.logging.format = trimmed
                    .parse::<LogFormat>()
                    .map_err(|reason| invalid(&name, value, &reason))?;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = if trimmed.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
            }
        }

        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(invalid(key, value, "must be greater than zero")),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid(key, value, "expected a positive integer")),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}
