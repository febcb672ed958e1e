use std::fs;
use std::path::PathBuf;

use super::SnapshotStore;
use crate::constants::paths;
use crate::error::{AgentError, Result};

/// Stores each key as `<dir>/<key>.json`.
pub struct FileSnapshotStore {
    base_dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| {
            AgentError::Storage(format!(
                "Failed to create data directory {}: {}",
                base_dir.display(),
                e
            ))
        })?;

        Ok(Self { base_dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", key, paths::SNAPSHOT_EXTENSION))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| AgentError::Storage(format!("Failed to read snapshot: {}", e)))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, value).map_err(|e| {
            AgentError::Storage(format!("Failed to write temporary snapshot file: {}", e))
        })?;

        fs::rename(&tmp_path, &path)
            .map_err(|e| AgentError::Storage(format!("Failed to rename snapshot file: {}", e)))?;

        Ok(())
    }
}
