//! Error types for the client layer.

use resdk_model::ModelError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed caller input, detected before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The identifier does not resolve to a resource visible to the caller.
    /// Absence and missing permission are deliberately not distinguished.
    #[error("{0}")]
    NotFound(String),

    /// The server rejected or failed a request.
    #[error("server error {status}: {message}")]
    Remote { status: u16, message: String },

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Resource model error (field validation, payload shape).
    #[error(transparent)]
    Model(ModelError),

    /// The server answered with an unexpected shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns true if this error is the transport's not-found fault.
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::NotFound(_) => true,
            ClientError::Remote { status, .. } => *status == 404,
            ClientError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 404),
            _ => false,
        }
    }

    /// Returns true if the caller's input was rejected locally.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ClientError::InvalidArgument(_))
    }
}

impl From<ModelError> for ClientError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidArgument(msg) => ClientError::InvalidArgument(msg),
            ModelError::Serialization(e) => ClientError::Serialization(e),
            other => ClientError::Model(other),
        }
    }
}

impl From<resdk_types::Error> for ClientError {
    fn from(err: resdk_types::Error) -> Self {
        ClientError::InvalidArgument(err.to_string())
    }
}
