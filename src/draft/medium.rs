use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::warn;

use crate::draft::error::StoreError;

/// String-keyed, whole-value persistence, in the shape of browser local storage.
pub trait StorageMedium {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ============================================================================
// In-memory medium
// ============================================================================

/// In-process medium. Clones share the same underlying map, the way two forms
/// on one page share the origin's local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored string, bypassing the store layer.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StorageMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// File-backed medium
// ============================================================================

/// One JSON object on disk mapping medium keys to stored strings.
/// A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            context: self.path.display().to_string(),
            source,
        })
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl StorageMedium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file would otherwise block every later write.
        let mut all = match self.read_all() {
            Err(StoreError::Json { context, source }) => {
                warn!("discarding unreadable storage file {}: {}", context, source);
                BTreeMap::new()
            }
            other => other?,
        };
        all.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&all).map_err(|source| StoreError::Json {
            context: "serialize medium".to_string(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

// ============================================================================
// Unavailable medium
// ============================================================================

/// Storage that refuses every access (private browsing, disabled storage).
#[derive(Debug, Clone, Default)]
pub struct UnavailableMedium;

impl StorageMedium for UnavailableMedium {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable(format!("read '{}'", key)))
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(format!("write '{}'", key)))
    }
}
