use serde::{Deserialize, Serialize};

use crate::{draft::values::DraftValues, identity::storage_key::StorageKey, session::error::SubmitError};

pub const DEFAULT_DEBOUNCE_MS: u64 = 0;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;
pub const DEFAULT_NOTICE_DURATION_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// Presentation cues the controller asks the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    FocusField(String),
    ScrollToTop,
    SetInteractive(bool),
}

/// Deferred work owned by a session. Carries the key and generation it was
/// scheduled under so a late firing after rebind or dispose is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTask {
    pub kind: TaskKind,
    pub key: StorageKey,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Write the current draft through to the durable store
    FlushDraft,
    /// Post-submit pause elapsed, perform the reset
    SettleSubmit,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Required fields missing; focus moved to `first_failing`
    Invalid { first_failing: Option<String> },
    /// Handed to the submitter; reset follows after the settle delay
    Submitted { values: DraftValues },
    /// Submitter failed; drafts kept, session back to Idle
    Rejected(SubmitError),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTiming {
    /// Delay before a field edit is written to the durable store
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Pause between a successful submit and the reset
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeTexts {
    #[serde(default = "default_success_title")]
    pub success_title: String,

    #[serde(default)]
    pub success_message: Option<String>,

    #[serde(default = "default_error_title")]
    pub error_title: String,

    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

impl Default for NoticeTexts {
    fn default() -> Self {
        Self {
            success_title: default_success_title(),
            success_message: None,
            error_title: default_error_title(),
            duration_ms: DEFAULT_NOTICE_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub timing: SessionTiming,
    pub notices: NoticeTexts,
}

fn default_debounce_ms() -> u64 { DEFAULT_DEBOUNCE_MS }
fn default_settle_delay_ms() -> u64 { DEFAULT_SETTLE_DELAY_MS }
fn default_duration_ms() -> u64 { DEFAULT_NOTICE_DURATION_MS }
fn default_success_title() -> String { "Submitted successfully".to_string() }
fn default_error_title() -> String { "Submission failed".to_string() }
