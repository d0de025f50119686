use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Backing file could not be read or written
    Io { path: String, source: std::io::Error },

    /// Persisted content is not valid JSON for the expected shape
    Json { context: String, source: serde_json::Error },

    /// Medium refuses all access (storage disabled, quota exhausted)
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "Storage file '{}' inaccessible: {}", path, source)
            }
            StoreError::Json { context, source } => {
                write!(f, "Stored JSON invalid ({}): {}", context, source)
            }
            StoreError::Unavailable(msg) => {
                write!(f, "Storage unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Json { source, .. } => Some(source),
            StoreError::Unavailable(_) => None,
        }
    }
}
