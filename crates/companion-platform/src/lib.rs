pub mod paths;
pub mod preferences;

pub use paths::{config_dir, config_file, data_dir, ensure_dirs, preferences_file};
pub use preferences::JsonPreferenceStore;
