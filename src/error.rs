//! Error types for vmlink
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while talking to an embedded VM
#[derive(Debug, Error)]
pub enum VmError {
    /// Caller input rejected before anything was sent
    #[error("{0}")]
    Validation(String),

    /// The remote side declined the command.
    ///
    /// Carries the composed `"<commandName>: <errorMessage>"` text verbatim.
    #[error("{0}")]
    Rejected(String),

    /// No response arrived within the configured bound
    #[error("{command}: request timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    /// The channel or the engine was torn down while waiting
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// A success reply did not have the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The init handshake never completed
    #[error("Connect error: {0}")]
    Connect(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VmError {
    /// True if the remote never answered, as opposed to answering "no".
    pub fn is_timeout(&self) -> bool {
        matches!(self, VmError::Timeout { .. })
    }
}

/// Result type alias for vmlink operations
pub type Result<T> = std::result::Result<T, VmError>;
