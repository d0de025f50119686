#![allow(dead_code)]

use std::collections::BTreeMap;

use form_session::{
    draft::{medium::MemoryMedium, store::DraftStore},
    identity::storage_key::FormIdentity,
    schema::field_model::FieldDescriptor,
    session::{
        controller::FormSession,
        error::SubmitError,
        notify::RecordingNotifier,
        session_model::{SessionOptions, SessionTiming},
        submit::{RecordingSubmitter, Submitter},
    },
};
use serde_json::Value;

pub type TestSession = FormSession<MemoryMedium, RecordingSubmitter, RecordingNotifier>;

pub const SETTLE_MS: u64 = 300;

/// `a` required, `b` optional.
pub fn two_fields() -> Vec<FieldDescriptor> {
    vec![FieldDescriptor::new("a", true), FieldDescriptor::new("b", false)]
}

pub fn identity(table: &str, view: &str) -> FormIdentity {
    FormIdentity::new(Some(table), Some(view))
}

pub fn options() -> SessionOptions {
    SessionOptions {
        timing: SessionTiming {
            debounce_ms: 0,
            settle_delay_ms: SETTLE_MS,
        },
        ..SessionOptions::default()
    }
}

pub fn mount(medium: &MemoryMedium, identity: FormIdentity, fields: &[FieldDescriptor]) -> TestSession {
    FormSession::mount(
        DraftStore::new(medium.clone()),
        RecordingSubmitter::new(),
        RecordingNotifier::new(),
        identity,
        fields,
        options(),
    )
}

/// Always fails with the given message.
#[derive(Debug, Default)]
pub struct FailingSubmitter {
    pub attempts: usize,
}

impl Submitter for FailingSubmitter {
    fn submit(&mut self, _values: &BTreeMap<String, Value>) -> Result<(), SubmitError> {
        self.attempts += 1;
        Err(SubmitError::Other("backend unavailable".into()))
    }
}
