//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, Transcription};

/// Port for Speech-to-Text (STT) implementations
///
/// Implementations of this trait convert audio data to text transcriptions.
///
/// # Example
///
/// ```ignore
/// use ai_speech::{SpeechToText, AudioData, AudioFormat};
///
/// async fn transcribe_wav(
///     stt: &impl SpeechToText,
///     wav: Vec<u8>,
/// ) -> Result<String, SpeechError> {
///     let transcription = stt.transcribe(AudioData::new(wav, AudioFormat::Wav)).await?;
///     Ok(transcription.text)
/// }
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the audio is empty or the backend call fails.
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError>;

    /// Get the name of the current STT model
    fn model_name(&self) -> &str;
}

/// Port for Text-to-Speech (TTS) implementations
///
/// Every implementation returns encoded audio bytes, whatever shape the
/// backend delivers them in.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::EmptyInput` for blank text, or another
    /// `SpeechError` if synthesis fails.
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError>;

    /// Get the name of the current TTS model
    fn model_name(&self) -> &str;
}
