//! Client error types

use thiserror::Error;

/// Errors returned by the ECS and CodeDeploy clients
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by the service itself. Displays the provider message
    /// unchanged.
    #[error("{message}")]
    Service {
        /// Exception name, e.g. `ClientException`
        code: String,
        /// HTTP status code
        status: u16,
        /// Provider message
        message: String,
    },

    /// Non-success response without a recognizable error body
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        message: String,
    },

    /// Request or response body could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Exception name for service errors
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
