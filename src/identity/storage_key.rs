use std::fmt;

use serde::{Deserialize, Serialize};

const KEY_PREFIX: &str = "formDraft:";

/// The (table, view) pair a form session belongs to. Either half may be
/// absent while the surrounding view is still loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FormIdentity {
    pub table_id: Option<String>,
    pub view_id: Option<String>,
}

impl FormIdentity {
    pub fn new(table_id: Option<&str>, view_id: Option<&str>) -> Self {
        Self {
            table_id: table_id.map(str::to_string),
            view_id: view_id.map(str::to_string),
        }
    }

    pub fn storage_key(&self) -> StorageKey {
        derive_key(self.table_id.as_deref(), self.view_id.as_deref())
    }

    /// Both halves known.
    pub fn is_loaded(&self) -> bool {
        self.table_id.is_some() && self.view_id.is_some()
    }
}

/// Namespace for one form's persisted draft.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for keys derived while the table or view id was still unknown.
    pub fn is_placeholder(&self) -> bool {
        self.0
            .strip_prefix(KEY_PREFIX)
            .and_then(|pair| serde_json::from_str::<[Option<String>; 2]>(pair).ok())
            .map(|[table, view]| table.is_none() || view.is_none())
            .unwrap_or(false)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the storage key for a (table, view) pair.
///
/// The pair is encoded as a JSON array, so every distinct pair maps to a
/// distinct key and an absent id (`null`) never matches a literal `"null"` id.
pub fn derive_key(table_id: Option<&str>, view_id: Option<&str>) -> StorageKey {
    let encoded = serde_json::Value::Array(vec![json_id(table_id), json_id(view_id)]);
    StorageKey(format!("{}{}", KEY_PREFIX, encoded))
}

fn json_id(id: Option<&str>) -> serde_json::Value {
    match id {
        Some(id) => serde_json::Value::String(id.to_string()),
        None => serde_json::Value::Null,
    }
}
