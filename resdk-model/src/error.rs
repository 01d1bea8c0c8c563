//! Error types for the resource model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building, validating or diffing resources.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Caller input has the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A read-only field was modified locally.
    #[error("field `{0}` is read-only and cannot be changed")]
    ReadOnlyField(String),

    /// An update-protected field was modified on a saved resource.
    #[error("field `{0}` cannot be changed once the resource is saved")]
    UpdateProtectedField(String),

    /// The resource has no id yet.
    #[error("{endpoint} must be saved before it can be used")]
    Unsaved { endpoint: &'static str },

    /// Payload did not serialize to a JSON object.
    #[error("{0} payload is not a JSON object")]
    NotAnObject(&'static str),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
