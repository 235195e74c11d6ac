//! Error type for the record gateway.

/// Errors that can occur when talking to the tabular record backend.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("Record backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Record backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode record backend response: {0}")]
    Decode(String),

    /// A row is missing a field the mapping requires.
    #[error("Record {record_id} is missing required field '{field}'")]
    MissingField {
        record_id: String,
        field: &'static str,
    },
}
