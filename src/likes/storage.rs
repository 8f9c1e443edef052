//! Key-value persistence for small pieces of user state.

use std::path::{Path, PathBuf};

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to create data directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to write {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A string-keyed, string-valued store.
///
/// Implement this trait to create mock implementations for testing.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StoreError::CreateDir(self.dir.clone(), e))?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value).map_err(|e| StoreError::Write(temp_path.clone(), e))?;
        std::fs::rename(&temp_path, &path).map_err(|e| StoreError::Write(path.clone(), e))?;

        tracing::debug!(target: "likes::store", path = %path.display(), "Saved");
        Ok(())
    }
}
