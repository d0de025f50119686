use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    draft::values::DraftValues, identity::storage_key::StorageKey,
    session::session_model::SubmissionState,
};

/// One line of the session trace. Field values never appear, only the draft
/// fingerprint.
#[derive(Debug, Serialize)]
pub struct SessionTrace {
    pub timestamp_ms: u128,
    pub storage_key: String,
    pub state: SubmissionState,

    pub event: String,

    pub field: Option<String>,
    pub draft_fingerprint: Option<String>,
    pub draft_len: Option<usize>,

    pub detail: Option<String>,
}

impl SessionTrace {
    pub fn now(key: &StorageKey, state: SubmissionState, event: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            storage_key: key.to_string(),
            state,
            event: event.to_string(),
            field: None,
            draft_fingerprint: None,
            draft_len: None,
            detail: None,
        }
    }

    pub fn with_field(mut self, field_id: &str) -> Self {
        self.field = Some(field_id.to_string());
        self
    }

    pub fn with_draft(mut self, drafts: &DraftValues) -> Self {
        self.draft_fingerprint = Some(drafts.fingerprint());
        self.draft_len = Some(drafts.len());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
