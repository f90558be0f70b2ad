use crate::error::BlendError;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key holding the saved-blend list.
pub const SAVED_BLENDS_KEY: &str = "essentialOilBlends";
/// Key holding the obfuscated API key.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";
/// Key holding the blend under construction and its analysis.
pub const WORKING_STATE_KEY: &str = "currentBlend";

/// Opaque string key/value persistence. Every `set` overwrites the whole value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, BlendError>;

    fn set(&self, key: &str, value: &str) -> Result<(), BlendError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), BlendError>;

    /// Name of this storage backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// One file per key inside a directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a reader sees either the old or the new value.
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

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn storage_error(key: &str, e: impl std::fmt::Display) -> BlendError {
        BlendError::Storage {
            key: key.to_string(),
            reason: e.to_string(),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlendError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::storage_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BlendError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::storage_error(key, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| Self::storage_error(key, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| Self::storage_error(key, e))?;
        tmp.persist(self.path_for(key))
            .map_err(|e| Self::storage_error(key, e.error))?;

        tracing::debug!(key, bytes = value.len(), "persisted value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlendError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::storage_error(key, e)),
        }
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}

/// Process-local store, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlendError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BlendError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlendError> {
        self.lock().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
