//! Service configuration.
//!
//! Settings are read from an INI file and can be overridden from the
//! environment. A missing file is not an error; every key has a default.
//!
//! ```ini
//! [server]
//! address = 0.0.0.0:1323
//!
//! [elevation]
//! zoom = 15
//! deadline_ms = 5000
//! max_concurrency =
//! cancel_on_expiry = true
//!
//! [provider]
//! base_url = https://s3.amazonaws.com/elevation-tiles-prod/terrarium
//! extension = png
//! timeout_secs = 30
//!
//! [logging]
//! level = info
//! format = json
//! file =
//! ```

mod keys;

pub use keys::ConfigKey;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::aggregator::{Aggregator, AggregatorConfig, DEFAULT_DEADLINE};
use crate::coord::{validate_zoom, DEFAULT_ZOOM};
use crate::logging::LogFormat;
use crate::provider::{
    AsyncReqwestClient, ProviderError, TerrariumProvider, DEFAULT_TIMEOUT_SECS, TERRARIUM_BASE_URL,
    TERRARIUM_EXTENSION,
};

/// Default listen address of the HTTP API.
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:1323";

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding `server.address`.
pub const ENV_SERVER_ADDR: &str = "SERVER_ADDR";

/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Environment variable overriding `provider.base_url`.
pub const ENV_TILE_URL: &str = "ELEVATE_TILE_URL";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write config file {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

/// `[elevation]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationSettings {
    pub zoom: u8,
    pub deadline: Duration,
    pub max_concurrency: Option<usize>,
    pub cancel_on_expiry: bool,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            deadline: DEFAULT_DEADLINE,
            max_concurrency: None,
            cancel_on_expiry: true,
        }
    }
}

/// `[provider]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub base_url: String,
    pub extension: String,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: TERRARIUM_BASE_URL.to_string(),
            extension: TERRARIUM_EXTENSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `elevate=debug,tower_http=info`.
    pub level: String,
    pub format: LogFormat,
    /// Log to this file instead of stdout.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Json,
            file: None,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub elevation: ElevationSettings,
    pub provider: ProviderSettings,
    pub logging: LoggingSettings,
}

/// Returns the config file location, `<config dir>/elevate/config.ini`.
///
/// Falls back to the working directory when the platform has no config dir.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("elevate")
        .join("config.ini")
}

impl ConfigFile {
    /// Loads the default config file, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads an explicit config file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        contents.parse()
    }

    /// Writes the configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Writes the configuration as INI, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }

    /// Applies environment overrides (`SERVER_ADDR`, `LOG_LEVEL`,
    /// `ELEVATE_TILE_URL`).
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from an arbitrary variable lookup. Empty values are
    /// ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(address) = lookup(ENV_SERVER_ADDR) {
            tracing::debug!(%address, "SERVER_ADDR override");
            self.server.address = normalize_address(&address);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(url) = lookup(ENV_TILE_URL) {
            self.provider.base_url = url;
        }
    }

    /// Builds the aggregator configuration from the `[elevation]` section.
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig::default()
            .with_zoom(self.elevation.zoom)
            .with_deadline(self.elevation.deadline)
            .with_max_concurrency(self.elevation.max_concurrency)
            .with_cancel_on_expiry(self.elevation.cancel_on_expiry)
    }

    /// Builds the terrarium provider and the aggregator on top of it.
    pub fn build_aggregator(&self) -> Result<Aggregator, ProviderError> {
        let client = AsyncReqwestClient::with_timeout(self.provider.timeout)?;
        let provider =
            TerrariumProvider::with_base_url(client, &self.provider.base_url, &self.provider.extension);
        Ok(Aggregator::new(Arc::new(provider), self.aggregator_config()))
    }

    /// Renders the configuration as an INI document.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section())).set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Renders the configuration as INI text.
    pub fn to_ini_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.to_ini().write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl FromStr for ConfigFile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ini = Ini::load_from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = ConfigFile::default();

        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|props| props.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }
}

/// Accepts the `:1323` shorthand for "all interfaces".
pub(crate) fn normalize_address(address: &str) -> String {
    let address = address.trim();
    if address.starts_with(':') {
        format!("0.0.0.0{}", address)
    } else {
        address.to_string()
    }
}

pub(crate) fn parse_zoom(key: &str, value: &str) -> Result<u8, ConfigError> {
    let zoom: u8 = value
        .trim()
        .parse()
        .map_err(|_| invalid(key, value, "expected an integer"))?;
    validate_zoom(zoom).map_err(|e| invalid(key, value, &e.to_string()))
}

pub(crate) fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
