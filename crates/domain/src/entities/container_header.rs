//! RIFF/WAVE container header
//!
//! Produces the canonical 44-byte header for uncompressed linear PCM:
//!
//! | Offset | Size | Field                         |
//! |--------|------|-------------------------------|
//! | 0      | 4    | `RIFF`                        |
//! | 4      | 4    | chunk size (total length − 8) |
//! | 8      | 4    | `WAVE`                        |
//! | 12     | 4    | `fmt `                        |
//! | 16     | 4    | fmt chunk size (16)           |
//! | 20     | 2    | format code (1 = PCM)         |
//! | 22     | 2    | channel count                 |
//! | 24     | 4    | sample rate                   |
//! | 28     | 4    | byte rate                     |
//! | 32     | 2    | block align                   |
//! | 34     | 2    | bits per sample               |
//! | 36     | 4    | `data`                        |
//! | 40     | 4    | data size                     |
//!
//! All integers are little-endian.

use crate::value_objects::AudioStreamDescriptor;

/// Length of a canonical PCM WAV header in bytes
pub const HEADER_LEN: usize = 44;

const PCM_FMT_CHUNK_SIZE: u32 = 16;
const PCM_FORMAT_CODE: u16 = 1;

/// Binary WAV header derived from an [`AudioStreamDescriptor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerHeader {
    bytes: [u8; HEADER_LEN],
}

impl ContainerHeader {
    /// Build the header for the given stream
    ///
    /// Deterministic: the same descriptor always yields the same bytes.
    #[must_use]
    pub fn synthesize(descriptor: &AudioStreamDescriptor) -> Self {
        let mut bytes = [0u8; HEADER_LEN];

        // RIFF chunk descriptor
        bytes[0..4].copy_from_slice(b"RIFF");
        bytes[4..8].copy_from_slice(&descriptor.riff_chunk_size().to_le_bytes());
        bytes[8..12].copy_from_slice(b"WAVE");

        // fmt sub-chunk
        bytes[12..16].copy_from_slice(b"fmt ");
        bytes[16..20].copy_from_slice(&PCM_FMT_CHUNK_SIZE.to_le_bytes());
        bytes[20..22].copy_from_slice(&PCM_FORMAT_CODE.to_le_bytes());
        bytes[22..24].copy_from_slice(&descriptor.channel_count().to_le_bytes());
        bytes[24..28].copy_from_slice(&descriptor.sample_rate_hz().to_le_bytes());
        bytes[28..32].copy_from_slice(&descriptor.byte_rate().to_le_bytes());
        bytes[32..34].copy_from_slice(&descriptor.block_align().to_le_bytes());
        bytes[34..36].copy_from_slice(&descriptor.bits_per_sample().to_le_bytes());

        // data sub-chunk
        bytes[36..40].copy_from_slice(b"data");
        bytes[40..44].copy_from_slice(&descriptor.payload_byte_length().to_le_bytes());

        Self { bytes }
    }

    /// Raw header bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; HEADER_LEN] {
        &self.bytes
    }

    /// RIFF chunk size field
    #[must_use]
    pub fn riff_chunk_size(&self) -> u32 {
        self.read_u32(4)
    }

    /// Format code field (1 for linear PCM)
    #[must_use]
    pub fn format_code(&self) -> u16 {
        self.read_u16(20)
    }

    /// Channel count field
    #[must_use]
    pub fn channel_count(&self) -> u16 {
        self.read_u16(22)
    }

    /// Sample rate field
    #[must_use]
    pub fn sample_rate_hz(&self) -> u32 {
        self.read_u32(24)
    }

    /// Byte rate field
    #[must_use]
    pub fn byte_rate(&self) -> u32 {
        self.read_u32(28)
    }

    /// Block align field
    #[must_use]
    pub fn block_align(&self) -> u16 {
        self.read_u16(32)
    }

    /// Bits per sample field
    #[must_use]
    pub fn bits_per_sample(&self) -> u16 {
        self.read_u16(34)
    }

    /// Data chunk size field
    #[must_use]
    pub fn data_size(&self) -> u32 {
        self.read_u32(40)
    }

    fn read_u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }

    fn read_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
            self.bytes[offset + 3],
        ])
    }
}

impl AsRef<[u8]> for ContainerHeader {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
