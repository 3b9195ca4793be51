pub mod errors;
pub mod events;
pub mod storage;
pub mod types;

pub use errors::{CompanionError, ConfigError, PlatformError, StorageError};
pub use events::{Event, EventBus};
pub use storage::{PreferenceRecord, PreferenceStore};
pub use types::{DisplayDescriptor, HostDisplay, Point, Rect, Size};

pub type Result<T> = std::result::Result<T, CompanionError>;
