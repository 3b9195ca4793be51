use std::path::PathBuf;

use companion_common::PlatformError;

pub(super) const APP_NAME: &str = "companion";

/// Returns the platform-specific configuration directory.
///
/// - macOS: `~/Library/Application Support/companion`
/// - Linux: `$XDG_CONFIG_HOME/companion` (defaults to `~/.config/companion`)
/// - Windows: `%APPDATA%\companion`
pub fn config_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::config_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine config directory".into()))?
        .join(APP_NAME))
}

/// Returns the platform-specific data directory.
///
/// - macOS: `~/Library/Application Support/companion`
/// - Linux: `$XDG_DATA_HOME/companion` (defaults to `~/.local/share/companion`)
/// - Windows: `%APPDATA%\companion`
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Returns the path to the main configuration file.
pub fn config_file() -> Result<PathBuf, PlatformError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the path to the saved avatar preferences.
pub fn preferences_file() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("preferences.json"))
}
