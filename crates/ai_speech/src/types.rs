//! Types for speech processing
//!
//! Contains data structures for audio payloads and transcriptions.

use serde::{Deserialize, Serialize};

/// Language reported for every transcription
pub const DEFAULT_LANGUAGE: &str = "en";

/// Audio formats flowing through the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// RIFF/WAVE container with linear PCM (transcription input)
    Wav,
    /// MP3 format (synthesis output)
    Mp3,
}

impl AudioFormat {
    /// Get the MIME type for this audio format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }
}

/// Container for audio bytes tagged with their format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData {
    data: Vec<u8>,
    format: AudioFormat,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the audio format
    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the size of the audio data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the MIME type for this audio
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Result of speech-to-text transcription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    /// Language of the transcript (ISO 639-1 code)
    pub language: String,
    /// Transcribed text
    pub text: String,
}

impl Transcription {
    /// Create a transcription in the default language
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            text: text.into(),
        }
    }

    /// Check if the transcription is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
