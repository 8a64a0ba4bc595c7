//! Init command - write a default configuration file.

use std::path::PathBuf;

use elevate::config::config_file_path;

use super::config::load_or_default;
use crate::error::CliError;

/// Run the init command.
///
/// An existing file is loaded and rewritten, so missing keys are filled in
/// with their defaults and existing values are kept.
pub fn run(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path.unwrap_or_else(config_file_path);
    let config = load_or_default(&path)?;
    config.save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize elevate settings.");
    println!("SERVER_ADDR, LOG_LEVEL and ELEVATE_TILE_URL override file values.");
    Ok(())
}
