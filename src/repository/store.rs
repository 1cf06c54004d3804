use crate::error::RepositoryError;
use ahash::AHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// A string-valued key-value store holding whole documents.
///
/// Writes replace the previous value entirely; there is no merging.
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` when nothing was stored under `key` yet.
    fn get(&self, key: &str) -> Result<Option<String>, RepositoryError>;

    fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError>;
}

/// A process-local store, mostly useful for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<AHashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let entries = self.entries.read().map_err(|e| RepositoryError::Read {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write().map_err(|e| RepositoryError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores every key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| RepositoryError::Read {
                key: key.to_string(),
                message: format!("could not read '{}': {}", path.display(), e),
            })
    }

    /// Writes to a sibling temp file first and renames it over the target.
    fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let write_error = |e: std::io::Error| RepositoryError::Write {
            key: key.to_string(),
            message: e.to_string(),
        };
        fs::create_dir_all(&self.dir).map_err(write_error)?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(write_error)?;
        fs::rename(&staging, &path).map_err(write_error)?;
        Ok(())
    }
}

