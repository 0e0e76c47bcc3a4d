//! Domain-level errors

use thiserror::Error;

/// Errors that can occur while building an audio container
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Declared stream parameters cannot describe a linear PCM stream
    #[error("Invalid stream descriptor: {0}")]
    InvalidStreamDescriptor(String),

    /// Payload length disagrees with the data size baked into the header
    #[error("Payload length mismatch: header declares {declared} bytes, received {actual}")]
    PayloadLengthMismatch {
        /// Data size written into the container header
        declared: u32,
        /// Number of payload bytes actually supplied
        actual: usize,
    },
}

impl DomainError {
    /// Create an invalid stream descriptor error
    pub fn invalid_descriptor(reason: impl Into<String>) -> Self {
        Self::InvalidStreamDescriptor(reason.into())
    }
}
