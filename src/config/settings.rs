//! Per-user tool settings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent defaults for the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Default workspace root used when the command line gives none.
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,

    /// Toolchain install directory, overriding XILINX_VITIS / PATH lookup.
    #[serde(default)]
    pub tool_dir: Option<PathBuf>,
}

/// Get the global settings path: ~/.config/hlsbuild/settings.json
pub fn global_settings_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::ValidationFailed("Cannot determine home directory".to_string())
    })?;

    Ok(home.join(".config/hlsbuild").join("settings.json"))
}

/// Load settings from a JSON file; a missing file yields defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Settings::default());
        }
        Err(e) => return Err(ConfigError::IoError(e)),
    };

    let settings: Settings = serde_json::from_str(&content).map_err(ConfigError::InvalidJson)?;
    Ok(settings)
}

/// Save settings as pretty JSON, creating parent directories as needed.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ConfigError::IoError)?;
        }
    }

    let json = serde_json::to_string_pretty(settings).map_err(ConfigError::InvalidJson)?;
    fs::write(path, json).map_err(ConfigError::IoError)?;
    Ok(())
}
