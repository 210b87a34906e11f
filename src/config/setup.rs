//! Interactive setup wizard for first-time configuration
//!
//! Prompts for the catalog API key when none is configured.

use super::WallifyConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::Path;

/// Interactive first-time setup - prompts for the catalog API key
///
/// Updates the key in the file at `path` and leaves every other stored
/// setting as it is. Environment overrides are not written back. Returns
/// the stored configuration. An empty answer keeps the key unset.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, user input cannot be
/// read, or the configuration cannot be saved.
pub fn first_time_setup(path: &Path) -> Result<WallifyConfig, ConfigError> {
    let mut config = WallifyConfig::load_file_only(path)?;

    println!("Welcome to wallify! An API key is needed to query the image catalog.");
    println!("Get one for free at https://pixabay.com/api/docs/\n");

    let api_key: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("API key")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    config.set_value("api_key", &api_key)?;
    config.save_to(path)?;

    println!("\nConfiguration saved to {}", path.display());
    Ok(config)
}
