use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use companion_common::{Point, PreferenceRecord, PreferenceStore, StorageError};

const FILE_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    models: BTreeMap<String, StoredPreference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPreference {
    position: Point,
    scale: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_origin: Option<Point>,
}

/// [`PreferenceStore`] persisting to a single JSON file.
///
/// Saves merge into the stored entry: optional fields absent from the
/// incoming record keep their stored value, so a plain position save
/// never erases a display origin recorded by an earlier relocation.
pub struct JsonPreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<PreferenceFile, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PreferenceFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, file: &PreferenceFile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn save(&self, record: PreferenceRecord) -> Result<bool, StorageError> {
        if record.model_path.is_empty() {
            return Err(StorageError::InvalidRecord("empty model path".into()));
        }
        if !record.is_persistable() {
            return Err(StorageError::InvalidRecord(format!(
                "non-finite transform for {}",
                record.model_path
            )));
        }

        let _guard = self.write_lock.lock().await;

        let mut file = match self.read_file().await {
            Ok(file) => file,
            Err(StorageError::Format(e)) => {
                warn!(path = %self.path.display(), error = %e, "preferences file unreadable, starting fresh");
                PreferenceFile::default()
            }
            Err(e) => return Err(e),
        };
        file.version = FILE_VERSION;

        let previous = file.models.get(&record.model_path);
        let merged = StoredPreference {
            position: record.position,
            scale: record.scale,
            rotation: record.rotation.or(previous.and_then(|p| p.rotation)),
            display_origin: record
                .display_origin
                .or(previous.and_then(|p| p.display_origin)),
        };
        file.models.insert(record.model_path.clone(), merged);

        self.write_file(&file).await?;
        debug!(model = %record.model_path, "preferences saved");
        Ok(true)
    }

    async fn load(&self, model_path: &str) -> Result<Option<PreferenceRecord>, StorageError> {
        let file = self.read_file().await?;
        let record = file.models.get(model_path).map(|p| PreferenceRecord {
            model_path: model_path.to_string(),
            position: p.position,
            scale: p.scale,
            rotation: p.rotation,
            display_origin: p.display_origin,
        });
        if record.is_some() {
            info!(model = %model_path, "loaded saved preferences");
        }
        Ok(record)
    }
}
