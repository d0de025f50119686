use std::collections::BTreeMap;

use log::warn;

use crate::{
    draft::{error::StoreError, medium::StorageMedium, values::DraftValues},
    identity::storage_key::StorageKey,
};

pub const DEFAULT_MEDIUM_KEY: &str = "formDrafts";

/// Every persisted draft, keyed by form identity.
pub type DraftMap = BTreeMap<StorageKey, DraftValues>;

/// Durable draft store: the whole [`DraftMap`] serialized as JSON under a
/// single medium key.
///
/// `try_*` methods report failures. The plain methods apply the persistence
/// policy: warn and carry on, so the in-memory draft stays authoritative.
#[derive(Debug, Clone)]
pub struct DraftStore<M: StorageMedium> {
    medium: M,
    medium_key: String,
}

impl<M: StorageMedium> DraftStore<M> {
    pub fn new(medium: M) -> Self {
        Self::with_key(medium, DEFAULT_MEDIUM_KEY)
    }

    pub fn with_key(medium: M, medium_key: &str) -> Self {
        Self {
            medium,
            medium_key: medium_key.to_string(),
        }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn try_load(&self) -> Result<DraftMap, StoreError> {
        match self.medium.get(&self.medium_key)? {
            None => Ok(DraftMap::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                context: format!("medium key '{}'", self.medium_key),
                source,
            }),
        }
    }

    pub fn try_save(&mut self, drafts: &DraftMap) -> Result<(), StoreError> {
        let json = serde_json::to_string(drafts).map_err(|source| StoreError::Json {
            context: "serialize drafts".to_string(),
            source,
        })?;
        self.medium.set(&self.medium_key, &json)
    }

    pub fn load(&self) -> DraftMap {
        match self.try_load() {
            Ok(drafts) => drafts,
            Err(e) => {
                warn!("draft store load failed, starting empty: {}", e);
                DraftMap::new()
            }
        }
    }

    pub fn save(&mut self, drafts: &DraftMap) {
        if let Err(e) = self.try_save(drafts) {
            warn!("draft store save skipped: {}", e);
        }
    }

    /// Persisted draft for one form, empty if none.
    pub fn entry(&self, key: &StorageKey) -> DraftValues {
        self.load().remove(key).unwrap_or_default()
    }

    /// Read-modify-write of a single entry. An empty draft removes the entry.
    pub fn put_entry(&mut self, key: &StorageKey, values: &DraftValues) {
        if values.is_empty() {
            self.remove_entry(key);
            return;
        }
        let mut drafts = self.load();
        drafts.insert(key.clone(), values.clone());
        self.save(&drafts);
    }

    pub fn remove_entry(&mut self, key: &StorageKey) {
        let mut drafts = self.load();
        if drafts.remove(key).is_some() {
            self.save(&drafts);
        }
    }
}
