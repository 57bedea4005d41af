//! Error types for the Docgate client.

use thiserror::Error;

use crate::transport::TransportFault;

/// Main error type for Docgate operations.
#[derive(Error, Debug)]
pub enum DocgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The document could not be encoded to the wire format
    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The window quota is exhausted; retry after the window elapses
    #[error("Request limit reached for the current window")]
    RateLimited,

    /// The wait for a concurrency permit was interrupted
    #[error("Wait for a concurrency permit was cancelled")]
    Cancelled,

    /// The remote returned a non-success status
    #[error("Remote rejected the document with status {status}")]
    RemoteRejected {
        /// HTTP status code returned by the remote
        status: u16,
    },

    /// Transport-level I/O failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportFault),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Docgate operations.
pub type Result<T> = std::result::Result<T, DocgateError>;
