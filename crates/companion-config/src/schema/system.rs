//! System configuration types: displays, storage and logging.

use serde::{Deserialize, Serialize};

/// Multi-monitor behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Move the window to the monitor under the avatar after a drag.
    pub relocate_on_drag: bool,
    /// On startup, move the window to the display the avatar was last
    /// saved on.
    pub restore_display: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            relocate_on_drag: true,
            restore_display: true,
        }
    }
}

/// Preference storage location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides `<data_dir>/companion/preferences.json`.
    pub preferences_file: Option<String>,
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
