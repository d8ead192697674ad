//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, DNS, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body is not the expected JSON document
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A listing endpoint answered with a non-success status
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The client could not be built from its configuration
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
