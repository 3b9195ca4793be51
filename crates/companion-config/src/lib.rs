//! Companion configuration system.
//!
//! Provides TOML-based configuration with live reload and validation.
//! All config sections use sensible defaults so partial configs work
//! out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use companion_config::load_config;
//!
//! # fn main() -> Result<(), companion_common::ConfigError> {
//! let config = load_config()?;
//! println!("proximity threshold: {}", config.focus.proximity_threshold);
//! # Ok(())
//! # }
//! ```

pub mod reload;
pub mod schema;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

pub use reload::ReloadManager;
pub use schema::CompanionConfig;
pub use watcher::ConfigWatcher;

use companion_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default `config.toml` if none exists.
pub fn load_config() -> Result<CompanionConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
