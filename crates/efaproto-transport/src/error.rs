use std::time::Duration;

/// Errors that can occur while moving bytes over a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the underlying device.
    #[error("failed to open {path}: {reason}")]
    Open { path: String, reason: String },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The reply did not arrive in full before the deadline.
    #[error("timed out after {timeout:?} ({received} of {expected} bytes received)")]
    Timeout {
        expected: usize,
        received: usize,
        timeout: Duration,
    },

    /// The stream reached end-of-file mid-read.
    #[error("transport closed ({received} of {expected} bytes received)")]
    Closed { expected: usize, received: usize },
}

impl TransportError {
    /// Returns true if the error is a read deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
