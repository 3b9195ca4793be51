//! Saved avatar preferences and the storage seam they are written through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::types::Point;

/// What gets persisted for one model after a gesture settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub model_path: String,
    pub position: Point,
    pub scale: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_origin: Option<Point>,
}

impl PreferenceRecord {
    /// Position and scale are finite numbers. Records failing this are
    /// never handed to a store.
    pub fn is_persistable(&self) -> bool {
        self.position.is_finite() && self.scale.is_finite()
    }
}

/// External preference storage.
///
/// `save` resolves to `Ok(false)` when the store declined the write
/// without an I/O fault.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn save(&self, record: PreferenceRecord) -> Result<bool, StorageError>;

    async fn load(&self, model_path: &str) -> Result<Option<PreferenceRecord>, StorageError>;
}
