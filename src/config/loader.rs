//! Config file loader and serialization.

use super::AppConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the global settings path: ~/.config/bore-dashboard/settings.json
pub fn get_global_settings_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .ok_or_else(|| {
            ConfigError::ValidationFailed("Cannot determine home directory".to_string())
        })?;

    Ok(config_dir.join("bore-dashboard").join("settings.json"))
}

/// Load config from JSON file.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
    validate_config_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save config to JSON file.
pub fn save_config_to_file(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json_content = serde_json::to_string_pretty(config)?;
    fs::write(path, json_content)?;
    Ok(())
}

/// Resolve the settings to use.
///
/// An explicit path must exist and parse. Without one, the global settings
/// file is used when present and defaults otherwise.
pub fn load_or_default(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit {
        log::info!("[Config] Loading settings from {}", path.display());
        return load_config_from_file(path);
    }

    let global = match get_global_settings_path() {
        Ok(path) => path,
        Err(e) => {
            log::warn!("[Config] {}; using defaults", e);
            return Ok(AppConfig::default());
        }
    };

    match load_config_from_file(&global) {
        Ok(config) => {
            log::info!("[Config] Loaded {}", global.display());
            Ok(config)
        }
        Err(ConfigError::FileNotFound(_)) => {
            log::debug!("[Config] No settings at {}; using defaults", global.display());
            Ok(AppConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Validate config path (.json extension required).
pub fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "json" => Ok(()),
        Some(ext) => Err(ConfigError::ValidationFailed(format!(
            "Configuration file must have .json extension, got .{}",
            ext.to_string_lossy()
        ))),
        None => Err(ConfigError::ValidationFailed(
            "Configuration file must have .json extension".to_string(),
        )),
    }
}
