//! Google Translate TTS provider
//!
//! Uses the public `translate_tts` endpoint, which streams MP3 for a short
//! query string. Only the first [`MAX_TEXT_CHARS`] characters are sent.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, AudioFormat};

/// Longest text forwarded to the endpoint, in characters
pub const MAX_TEXT_CHARS: usize = 200;

const MODEL_NAME: &str = "google-translate-tts";

/// Text-to-speech through Google Translate
#[derive(Debug, Clone)]
pub struct GoogleTranslateTtsProvider {
    client: Client,
    config: SpeechConfig,
}

impl GoogleTranslateTtsProvider {
    /// Create a new Google Translate TTS provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }
}

/// Cut `text` down to at most `max_chars` Unicode scalar values
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[async_trait]
impl TextToSpeech for GoogleTranslateTtsProvider {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyInput);
        }

        let query = truncate_chars(text, MAX_TEXT_CHARS);
        debug!(sent_len = query.len(), "Synthesizing speech with Google Translate");

        let response = self
            .client
            .get(&self.config.google_tts_url)
            .query(&[
                ("ie", "UTF-8"),
                ("tl", self.config.google_tts_language.as_str()),
                ("client", "tw-ob"),
                ("q", query),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::UpstreamStatus {
                service: "Google TTS",
                status: status.as_u16(),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        debug!(audio_size = audio.len(), "Speech synthesis complete");

        Ok(AudioData::new(audio.to_vec(), AudioFormat::Mp3))
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
