use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// In-progress field values for one form session, keyed by field id.
///
/// Absent and `null` are the same thing here: setting a field to `null`
/// removes the entry, so a persisted draft never carries explicit nulls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct DraftValues {
    values: BTreeMap<String, Value>,
}

impl DraftValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_id: &str) -> Option<&Value> {
        self.values.get(field_id)
    }

    /// Field holds a non-null value.
    pub fn is_present(&self, field_id: &str) -> bool {
        matches!(self.values.get(field_id), Some(v) if !v.is_null())
    }

    pub fn set(&mut self, field_id: &str, value: Value) {
        if value.is_null() {
            self.remove(field_id);
        } else {
            self.values.insert(field_id.to_string(), value);
        }
    }

    pub fn remove(&mut self, field_id: &str) -> Option<Value> {
        self.values.remove(field_id)
    }

    /// Clears memory only; the durable entry is cleared separately.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Owned copy handed to the submit collaborator.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.values.clone()
    }

    /// SHA-1 of the canonical JSON encoding. Traces record this instead of values.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let canonical = serde_json::to_string(&self.values).unwrap_or_default();
        let mut hasher = Sha1::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl From<BTreeMap<String, Value>> for DraftValues {
    fn from(values: BTreeMap<String, Value>) -> Self {
        values.into_iter().collect()
    }
}

impl From<DraftValues> for BTreeMap<String, Value> {
    fn from(draft: DraftValues) -> Self {
        draft.values
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for DraftValues {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut draft = DraftValues::new();
        for (k, v) in iter {
            draft.set(&k.into(), v);
        }
        draft
    }
}

/// `null`, an empty string or an empty list: a value that does not count as
/// filling a field in.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
