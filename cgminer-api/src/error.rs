//! Error types for the cgminer API client.

use std::time::Duration;

use thiserror::Error;

/// Errors produced while talking to the daemon.
///
/// Every variant is fatal for the call that produced it. Nothing is retried.
#[derive(Error, Debug)]
pub enum ApiError {
    /// TCP dial to the daemon failed (refused, unreachable, bad address)
    #[error("Connection to {endpoint} failed: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// TCP dial did not complete within the connect timeout
    #[error("Connection to {endpoint} timed out after {timeout:?}")]
    ConnectTimeout { endpoint: String, timeout: Duration },

    /// Write or read failed after the connection was established
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Peer closed the connection before sending the terminator byte
    #[error("Incomplete response: connection closed after {received} bytes without terminator")]
    Framing { received: usize },

    /// Request could not be encoded
    #[error("Failed to encode request: {0}")]
    Encoding(String),

    /// Repaired response was not the JSON shape expected for the command
    #[error("Failed to decode '{command}' response: {source}")]
    Decode {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Payload or status list length violated the command's contract
    #[error("Unexpected '{command}' response: expected {expected} entries, got {actual}")]
    UnexpectedCardinality {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Daemon reported failure in its status block
    #[error("Daemon error {code}: {description}")]
    Remote { code: i64, description: String },
}

impl ApiError {
    /// True for failures to reach the daemon at all.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            ApiError::Connection { .. } | ApiError::ConnectTimeout { .. }
        )
    }
}

/// Convenient Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
