//! Serialization error types.

use thiserror::Error;

/// Errors that can occur while building or rendering a serial tree.
#[derive(Debug, Error)]
pub enum SerdeError {
    /// JSON encoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A payload could not be converted to a serializable value.
    #[error("payload of type {0} is not serializable")]
    NotSerializable(String),
}
