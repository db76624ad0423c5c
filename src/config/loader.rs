//! Settings file discovery and loading.
//!
//! Settings are resolved in this order (first hit wins):
//! 1. An explicit path (`--config` or `LIVEPROTO_SETUP_CONFIG`), which must exist
//! 2. `~/.config/liveproto-setup/config.yml`, if present
//! 3. Built-in defaults

use crate::config::schema::Settings;
use crate::error::{ProvisionError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the per-user settings file relative to HOME.
pub fn user_config_path(home: &Path) -> PathBuf {
    home.join(".config")
        .join("liveproto-setup")
        .join("config.yml")
}

/// Load settings from an explicit file, the user config, or defaults.
pub fn load_settings(explicit: Option<&Path>, home: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return load_settings_file(path);
    }

    if let Some(path) = home.map(user_config_path).filter(|p| p.is_file()) {
        return load_settings_file(&path);
    }

    tracing::debug!("No settings file found, using defaults");
    Ok(Settings::default())
}

/// Load a single settings file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProvisionError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProvisionError::Io(e)
        }
    })?;

    tracing::debug!("Loading settings from {}", path.display());
    parse_settings(&content, path)
}

/// Parse YAML content into Settings.
///
/// An empty document yields the defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(content).map_err(|e| ProvisionError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
