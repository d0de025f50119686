use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::session::error::SubmitError;

/// External collaborator that receives a snapshot of the draft on submit.
pub trait Submitter {
    fn submit(&mut self, values: &BTreeMap<String, Value>) -> Result<(), SubmitError>;
}

impl<T: Submitter + ?Sized> Submitter for Box<T> {
    fn submit(&mut self, values: &BTreeMap<String, Value>) -> Result<(), SubmitError> {
        (**self).submit(values)
    }
}

#[derive(Serialize)]
struct SubmitPayload<'a> {
    fields: &'a BTreeMap<String, Value>,
}

// ============================================================================
// HTTP submitter
// ============================================================================

/// POSTs `{"fields": {...}}` as JSON. Any non-2xx answer is a rejection.
pub struct HttpSubmitter {
    pub endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpSubmitter {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Submitter for HttpSubmitter {
    fn submit(&mut self, values: &BTreeMap<String, Value>) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SubmitPayload { fields: values })
            .send()
            .map_err(|source| SubmitError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

// ============================================================================
// Stdout submitter
// ============================================================================

/// Prints the payload as one JSON line. Used when no endpoint is configured.
#[derive(Debug, Default)]
pub struct StdoutSubmitter;

impl Submitter for StdoutSubmitter {
    fn submit(&mut self, values: &BTreeMap<String, Value>) -> Result<(), SubmitError> {
        let json = serde_json::to_string(&SubmitPayload { fields: values })
            .map_err(SubmitError::Serialize)?;
        println!("{}", json);
        Ok(())
    }
}

// ============================================================================
// Recording submitter (tests, dry runs)
// ============================================================================

/// Keeps every snapshot it receives.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    pub submissions: Vec<BTreeMap<String, Value>>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.submissions.len()
    }
}

impl Submitter for RecordingSubmitter {
    fn submit(&mut self, values: &BTreeMap<String, Value>) -> Result<(), SubmitError> {
        self.submissions.push(values.clone());
        Ok(())
    }
}
