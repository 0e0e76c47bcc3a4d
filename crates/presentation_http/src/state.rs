//! Application state shared across handlers

use std::{fmt, sync::Arc};

use ai_speech::{SpeechToText, TextToSpeech};

use crate::config::AppConfig;

/// Shared application state
///
/// Backends are built once at start-up and injected here.
#[derive(Clone)]
pub struct AppState {
    /// Speech-to-text backend for Willow uploads
    pub transcriber: Arc<dyn SpeechToText>,
    /// Google Translate TTS backend for `/api/tts`
    pub translate_tts: Arc<dyn TextToSpeech>,
    /// Neural TTS backend for `/api/melotts`
    pub neural_tts: Arc<dyn TextToSpeech>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("transcriber", &self.transcriber.model_name())
            .field("translate_tts", &self.translate_tts.model_name())
            .field("neural_tts", &self.neural_tts.model_name())
            .finish_non_exhaustive()
    }
}
