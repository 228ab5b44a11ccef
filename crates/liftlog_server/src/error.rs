//! Error types for the server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use liftlog_sync_protocol::ProtocolError;
use serde::Serialize;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving requests.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A batch exceeded the configured maximum.
    #[error("batch too large: {size} > {max}")]
    BatchTooLarge {
        /// Entries in the rejected batch.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] liftlog_storage::StorageError),

    /// Snapshot encoding error.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The persisted snapshot could not be decoded.
    #[error("store corrupted: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },

    /// I/O error (socket bind, listener).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Creates a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }
}

impl From<ProtocolError> for ServerError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::MissingField { field } => {
                Self::InvalidRequest(format!("{field} is required"))
            }
            ProtocolError::Codec(e) => Self::InvalidRequest(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::InvalidRequest(_) | Self::BatchTooLarge { .. } => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Codec(_) | Self::Corrupted { .. } | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
