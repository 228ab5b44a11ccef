//! Error types for protocol encoding and validation.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding, decoding, or validating messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A required field was absent on a direct submission.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
}

impl ProtocolError {
    /// Creates a missing-field validation error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
