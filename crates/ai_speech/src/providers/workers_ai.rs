//! Cloudflare Workers AI speech provider
//!
//! Implements `SpeechToText` with the hosted Whisper model and `TextToSpeech`
//! with MeloTTS, both through the Workers AI REST API:
//!
//! ```text
//! POST {base}/accounts/{account_id}/ai/run/{model}
//! ```
//!
//! Whisper takes the raw WAV bytes as body. MeloTTS takes `{prompt, lang}` and
//! answers with base64-encoded MP3, which is decoded here so callers only ever
//! see raw audio bytes.

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{AudioData, AudioFormat, Transcription};

/// Workers AI provider implementing both STT and TTS
#[derive(Debug, Clone)]
pub struct WorkersAiProvider {
    client: Client,
    config: SpeechConfig,
    account_id: String,
    api_token: String,
}

impl WorkersAiProvider {
    /// Create a new Workers AI provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid
    /// or the Cloudflare credentials are missing.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let (account_id, api_token) = config
            .workers_ai_credentials()
            .map(|(account, token)| (account.to_string(), token.to_string()))
            .map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            account_id,
            api_token,
        })
    }

    /// Build the run endpoint for a model
    fn run_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.config.workers_ai_base_url.trim_end_matches('/'),
            self.account_id,
            model
        )
    }

    /// Unwrap the `{success, errors, result}` envelope
    ///
    /// `fail` builds the error for backend-reported failures so STT and TTS
    /// keep their own error variants.
    async fn read_envelope<T: DeserializeOwned>(
        response: Response,
        fail: fn(String) -> SpeechError,
    ) -> Result<T, SpeechError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
                if !envelope.errors.is_empty() {
                    return Err(fail(envelope.error_summary()));
                }
            }
            return Err(fail(format!("HTTP {status}: {body}")));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        if !envelope.success {
            return Err(fail(envelope.error_summary()));
        }

        envelope
            .result
            .ok_or_else(|| SpeechError::InvalidResponse("Response has no result".to_string()))
    }
}

/// Workers AI response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<EnvelopeMessage>,
    result: Option<T>,
}

impl<T> Envelope<T> {
    fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "backend reported failure".to_string();
        }
        self.errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} (code {code})", e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Deserialize)]
struct EnvelopeMessage {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

/// Whisper result payload
#[derive(Debug, Deserialize)]
struct WhisperResult {
    text: String,
}

/// MeloTTS request body
#[derive(Debug, Serialize)]
struct MeloTtsRequest<'a> {
    prompt: &'a str,
    lang: &'a str,
}

/// MeloTTS result payload
#[derive(Debug, Deserialize)]
struct MeloTtsResult {
    audio: String,
}

#[async_trait]
impl SpeechToText for WorkersAiProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), model = %self.config.stt_model))]
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        debug!("Transcribing audio with Workers AI");

        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        let response = self
            .client
            .post(self.run_url(&self.config.stt_model))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(audio.into_data())
            .send()
            .await?;

        let result: WhisperResult =
            Self::read_envelope(response, SpeechError::TranscriptionFailed).await?;

        debug!(text_len = result.text.len(), "Transcription complete");

        Ok(Transcription::new(result.text))
    }

    fn model_name(&self) -> &str {
        &self.config.stt_model
    }
}

#[async_trait]
impl TextToSpeech for WorkersAiProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), model = %self.config.tts_model))]
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError> {
        debug!("Synthesizing speech with Workers AI");

        if text.trim().is_empty() {
            return Err(SpeechError::EmptyInput);
        }

        let request = MeloTtsRequest {
            prompt: text,
            lang: &self.config.tts_language,
        };

        let response = self
            .client
            .post(self.run_url(&self.config.tts_model))
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let result: MeloTtsResult =
            Self::read_envelope(response, SpeechError::SynthesisFailed).await?;

        let audio = STANDARD
            .decode(result.audio.as_bytes())
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to decode audio: {e}")))?;

        debug!(audio_size = audio.len(), "Speech synthesis complete");

        Ok(AudioData::new(audio, AudioFormat::Mp3))
    }

    fn model_name(&self) -> &str {
        &self.config.tts_model
    }
}
