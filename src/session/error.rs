use std::fmt;

#[derive(Debug)]
pub enum SessionError {
    /// A submit is in flight; input is disabled until it settles
    Busy,

    /// Field id is not one of the form's visible fields
    UnknownField(String),

    /// Session was disposed and no longer accepts events
    Disposed,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Busy => write!(f, "Form is submitting; input disabled"),
            SessionError::UnknownField(id) => write!(f, "Field '{}' is not on this form", id),
            SessionError::Disposed => write!(f, "Form session already disposed"),
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug)]
pub enum SubmitError {
    /// Request never got a response
    Transport { endpoint: String, source: reqwest::Error },

    /// Endpoint answered with a non-success status
    Rejected { status: u16, body: String },

    /// Payload could not be encoded
    Serialize(serde_json::Error),

    /// Any other collaborator-reported failure
    Other(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Transport { endpoint, source } => {
                write!(f, "Could not reach {}: {}", endpoint, source)
            }
            SubmitError::Rejected { status, body } => {
                write!(f, "Submission rejected with status {}: {}", status, body)
            }
            SubmitError::Serialize(source) => {
                write!(f, "Could not encode submission: {}", source)
            }
            SubmitError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Transport { source, .. } => Some(source),
            SubmitError::Serialize(source) => Some(source),
            _ => None,
        }
    }
}
