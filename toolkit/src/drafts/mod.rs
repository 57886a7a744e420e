// Draft auto-save: form input is persisted as it is typed.
use crate::error::ToolkitError;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::NamedTempFile;

const DRAFT_PREFIX: &str = "draft_";
const TEMPORARY_PREFIX: &str = "temp_";

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn set(&self, key: &str, value: &str) -> Result<(), ToolkitError>;
    fn get(&self, key: &str) -> Result<Option<String>, ToolkitError>;
    fn remove(&self, key: &str) -> Result<(), ToolkitError>;
    fn keys(&self) -> Result<Vec<String>, ToolkitError>;
}

/// Key-value store kept in a single JSON object on disk. Every write replaces
/// the file atomically.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, ToolkitError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                ToolkitError::StorageError(format!("Corrupt store '{}': {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), ToolkitError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| ToolkitError::StorageError(e.to_string()))?;
        let mut staged = NamedTempFile::new_in(&dir)?;
        staged.write_all(&body)?;
        staged.flush()?;
        staged.persist(&self.path).map_err(|e| ToolkitError::from(e.error))?;
        Ok(())
    }

    fn update<F>(&self, change: F) -> Result<(), ToolkitError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        if change(&mut entries) {
            self.store(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> Result<(), ToolkitError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn get(&self, key: &str) -> Result<Option<String>, ToolkitError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn remove(&self, key: &str) -> Result<(), ToolkitError> {
        self.update(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, ToolkitError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.into_keys().collect())
    }
}

pub fn draft_key(form_id: &str, field_name: &str) -> String {
    format!("{}{}_{}", DRAFT_PREFIX, form_id, field_name)
}

#[derive(Clone)]
pub struct DraftRecorder {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for DraftRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftRecorder").finish_non_exhaustive()
    }
}

impl DraftRecorder {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Called on every input change of a form field.
    pub fn on_input(&self, form_id: &str, field_name: &str, value: &str) -> Result<(), ToolkitError> {
        let key = draft_key(form_id, field_name);
        tracing::trace!(key = %key, "Saving draft");
        self.store.set(&key, value)
    }

    pub fn draft(&self, form_id: &str, field_name: &str) -> Result<Option<String>, ToolkitError> {
        self.store.get(&draft_key(form_id, field_name))
    }

    /// Drops every `temp_` entry, as done when a page unloads. Returns how
    /// many were removed.
    pub fn purge_temporary(&self) -> Result<usize, ToolkitError> {
        let temporary: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(TEMPORARY_PREFIX))
            .collect();
        for key in &temporary {
            self.store.remove(key)?;
        }
        if !temporary.is_empty() {
            tracing::debug!(count = temporary.len(), "Purged temporary entries");
        }
        Ok(temporary.len())
    }
}
