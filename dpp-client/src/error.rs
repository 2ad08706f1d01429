//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with an error envelope
    #[error("API error: {0}")]
    Api(String),

    /// Response did not match the expected envelope shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credential not accepted
    #[error("Unauthorized")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the server never produced an answer.
    ///
    /// A decode failure means the server did answer, just not with the
    /// expected shape; the prober treats that as a rejection of the
    /// role, not as an outage.
    pub fn is_transport(&self) -> bool {
        match self {
            ClientError::Http(e) => !e.is_decode(),
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
