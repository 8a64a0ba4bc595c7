//! Shared command setup: configuration, logging and the async runtime.

use std::path::{Path, PathBuf};

use elevate::config::{config_file_path, ConfigFile};
use elevate::logging::{init_logging, init_stderr_logging, LoggingGuard};
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Loads configuration once and bootstraps the process for a command.
pub struct CliRunner {
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Loads the config file (explicit path or default location) and applies
    /// environment overrides.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let (mut config, config_path) = match config_path {
            Some(path) => (ConfigFile::load_from(path)?, path.to_path_buf()),
            None => (ConfigFile::load()?, config_file_path()),
        };
        config.apply_env();
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigFile {
        &mut self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Installs the subscriber configured in `[logging]`.
    pub fn init_logging(&self) -> Result<LoggingGuard, CliError> {
        Ok(init_logging(&self.config.logging)?)
    }

    /// Installs a stderr subscriber for commands that print to stdout.
    pub fn init_quiet_logging(&self, directive: &str) -> Result<LoggingGuard, CliError> {
        Ok(init_stderr_logging(directive)?)
    }

    /// Logs the startup banner for a command.
    pub fn log_startup(&self, command: &str) {
        info!(
            version = elevate::VERSION,
            command,
            config = %self.config_path.display(),
            "elevate starting"
        );
    }

    /// Builds a multi-threaded tokio runtime.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))
    }
}
