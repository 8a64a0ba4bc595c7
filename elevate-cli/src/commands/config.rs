//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config show`, and `config path`
//! for viewing and modifying settings from the command line.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use elevate::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., elevation.zoom)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., elevation.zoom)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show the effective configuration, environment overrides included
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against `path` or the default location.
pub fn run(command: ConfigCommands, path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path.unwrap_or_else(config_file_path);
    match command {
        ConfigCommands::Get { key } => run_get(&path, &key),
        ConfigCommands::Set { key, value } => run_set(&path, &key, &value),
        ConfigCommands::Show => run_show(&path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'elevate config show' to see available keys.",
            key
        ))
    })
}

/// Loads the file at `path`, or defaults when it does not exist yet.
pub fn load_or_default(path: &Path) -> Result<ConfigFile, CliError> {
    if path.exists() {
        Ok(ConfigFile::load_from(path)?)
    } else {
        Ok(ConfigFile::default())
    }
}

fn run_get(path: &Path, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = load_or_default(path)?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn run_set(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let mut config = load_or_default(path)?;
    config_key.set(&mut config, value)?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key.name(), value);

    Ok(())
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let mut config = load_or_default(path)?;
    config.apply_env();

    println!("# {}", path.display());
    print!("{}", config.to_ini_string());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        run_set(&path, "elevation.deadline_ms", "1200").unwrap();
        run_set(&path, "server.address", ":8080").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.elevation.deadline.as_millis(), 1200);
        assert_eq!(config.server.address, "0.0.0.0:8080");
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let result = run_set(&path, "server.port", "80");
        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_set_rejects_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        assert!(run_set(&path, "elevation.zoom", "99").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
