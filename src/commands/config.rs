//! Config command - read and update settings

use crate::{
    WallifyError,
    cli::ConfigCommands,
    config::{self, WallifyConfig},
    ui::OutputWriter,
};
use std::path::Path;

type Result<T> = std::result::Result<T, WallifyError>;

/// Execute a config subcommand against the file at `path`
///
/// `config` is the effective, layered configuration used by `get` and
/// `show`. `set` and `setup` modify only what is stored in the file.
///
/// # Errors
///
/// Returns `WallifyError::InvalidInput` for a malformed `KEY=VALUE` or an
/// unknown key, and `WallifyError::ConfigError` for a value that does not
/// parse or if reading or saving the file fails.
pub fn execute(
    config: WallifyConfig,
    path: &Path,
    command: &ConfigCommands,
    out: &dyn OutputWriter,
) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                WallifyError::InvalidInput(
                    "Invalid format. Use: wallify config set key=value".into(),
                )
            })?;
            let key = key.trim();
            if !config::KEYS.contains(&key) {
                return Err(unknown_key(key));
            }

            let mut stored = WallifyConfig::load_file_only(path)?;
            stored.set_value(key, value.trim())?;
            stored.save_to(path)?;
            out.success(&format!("Set {key} = {}", display_value(&stored, key)));
        }
        ConfigCommands::Get { key } => {
            let value = config.get_value(key).ok_or_else(|| unknown_key(key))?;
            out.write(&value);
        }
        ConfigCommands::Show => {
            for key in config::KEYS {
                out.write(&format!("{key} = {}", display_value(&config, key)));
            }
        }
        ConfigCommands::Path => out.write(&path.display().to_string()),
        ConfigCommands::Setup => {
            config::first_time_setup(path)?;
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> WallifyError {
    WallifyError::InvalidInput(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        config::KEYS.join(", ")
    ))
}

/// Setting value for display, with the API key masked
fn display_value(config: &WallifyConfig, key: &str) -> String {
    if key == "api_key" {
        let Some(api_key) = config.api_key() else {
            return "(not set)".to_string();
        };
        let count = api_key.chars().count();
        if count <= 4 {
            return "****".to_string();
        }
        let tail: String = api_key.chars().skip(count - 4).collect();
        return format!("{}{tail}", "*".repeat(count - 4));
    }
    config.get_value(key).unwrap_or_default()
}
