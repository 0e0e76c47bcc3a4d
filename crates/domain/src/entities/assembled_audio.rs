//! Assembled WAV buffer: container header followed by the raw PCM payload

use crate::entities::container_header::{ContainerHeader, HEADER_LEN};
use crate::errors::DomainError;

/// A complete, decodable WAV file held in memory
///
/// Immutable once assembled. The header's data size always equals the
/// payload length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledAudioBuffer {
    bytes: Vec<u8>,
}

impl AssembledAudioBuffer {
    /// Concatenate `header` and `payload`, header first
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PayloadLengthMismatch`] if the payload length
    /// differs from the data size declared in the header.
    pub fn assemble(header: &ContainerHeader, payload: &[u8]) -> Result<Self, DomainError> {
        let declared = header.data_size();
        let matches = usize::try_from(declared).is_ok_and(|expected| expected == payload.len());
        if !matches {
            return Err(DomainError::PayloadLengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(payload);

        Ok(Self { bytes })
    }

    /// The whole container, header included
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The 44 header bytes
    #[must_use]
    pub fn header_bytes(&self) -> &[u8] {
        &self.bytes[..HEADER_LEN]
    }

    /// The PCM payload following the header
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    /// Total length: header plus payload
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false, a buffer carries at least its header
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the buffer and return its bytes
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<AssembledAudioBuffer> for Vec<u8> {
    fn from(buffer: AssembledAudioBuffer) -> Self {
        buffer.into_bytes()
    }
}
