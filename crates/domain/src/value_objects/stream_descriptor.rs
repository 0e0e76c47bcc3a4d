//! Audio stream descriptor value object

use std::fmt;

use crate::errors::DomainError;

/// Size of the RIFF header that follows the chunk size field, plus the
/// `fmt ` and `data` chunk preambles. The RIFF chunk size is this value plus
/// the payload length.
pub const RIFF_OVERHEAD: u32 = 36;

/// Parameters of a raw linear PCM stream as declared by the sending device
///
/// Only constructible through [`AudioStreamDescriptor::new`], which rejects
/// any combination whose derived container fields would not be exact or
/// would overflow their on-disk width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioStreamDescriptor {
    channel_count: u16,
    sample_rate_hz: u32,
    bits_per_sample: u16,
    payload_byte_length: u32,
    byte_rate: u32,
    block_align: u16,
}

impl AudioStreamDescriptor {
    /// Create a validated stream descriptor
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::AudioStreamDescriptor;
    ///
    /// let descriptor = AudioStreamDescriptor::new(1, 16_000, 16, 320).unwrap();
    /// assert_eq!(descriptor.byte_rate(), 32_000);
    /// assert_eq!(descriptor.block_align(), 2);
    ///
    /// assert!(AudioStreamDescriptor::new(1, 16_000, 12, 320).is_err());
    /// ```
    pub fn new(
        channel_count: u16,
        sample_rate_hz: u32,
        bits_per_sample: u16,
        payload_byte_length: u32,
    ) -> Result<Self, DomainError> {
        if channel_count == 0 {
            return Err(DomainError::invalid_descriptor(
                "channel count must be at least 1",
            ));
        }

        if sample_rate_hz == 0 {
            return Err(DomainError::invalid_descriptor(
                "sample rate must be at least 1 Hz",
            ));
        }

        if bits_per_sample == 0 || bits_per_sample % 8 != 0 {
            return Err(DomainError::invalid_descriptor(format!(
                "bits per sample must be a non-zero multiple of 8, got {bits_per_sample}"
            )));
        }

        let bytes_per_sample = u64::from(bits_per_sample / 8);

        let byte_rate = u32::try_from(
            u64::from(sample_rate_hz) * u64::from(channel_count) * bytes_per_sample,
        )
        .map_err(|_| DomainError::invalid_descriptor("byte rate exceeds 32 bits"))?;

        let block_align = u16::try_from(u64::from(channel_count) * bytes_per_sample)
            .map_err(|_| DomainError::invalid_descriptor("block align exceeds 16 bits"))?;

        if payload_byte_length.checked_add(RIFF_OVERHEAD).is_none() {
            return Err(DomainError::invalid_descriptor(format!(
                "payload of {payload_byte_length} bytes does not fit a RIFF container"
            )));
        }

        Ok(Self {
            channel_count,
            sample_rate_hz,
            bits_per_sample,
            payload_byte_length,
            byte_rate,
            block_align,
        })
    }

    /// Number of interleaved channels
    #[must_use]
    pub const fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Samples per second, per channel
    #[must_use]
    pub const fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Bit depth of a single sample
    #[must_use]
    pub const fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// Length of the raw PCM payload in bytes
    #[must_use]
    pub const fn payload_byte_length(&self) -> u32 {
        self.payload_byte_length
    }

    /// Bytes per second of audio: sample rate × channels × bits / 8
    #[must_use]
    pub const fn byte_rate(&self) -> u32 {
        self.byte_rate
    }

    /// Bytes per sample frame: channels × bits / 8
    #[must_use]
    pub const fn block_align(&self) -> u16 {
        self.block_align
    }

    /// RIFF chunk size, i.e. the total container length minus 8
    #[must_use]
    pub const fn riff_chunk_size(&self) -> u32 {
        // Overflow excluded in `new`.
        self.payload_byte_length + RIFF_OVERHEAD
    }

    /// Playback duration of the payload in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.payload_byte_length) * 1000 / u64::from(self.byte_rate)
    }
}

impl fmt::Display for AudioStreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ch {}Hz {}-bit, {} bytes",
            self.channel_count, self.sample_rate_hz, self.bits_per_sample, self.payload_byte_length
        )
    }
}
