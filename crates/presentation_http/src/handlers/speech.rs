//! Text-to-speech endpoints
//!
//! `GET /api/tts?text=` uses Google Translate, `GET /api/melotts?text=` the
//! neural model. Both answer with `audio/mpeg`.

use ai_speech::TextToSpeech;
use axum::{
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::{
    error::{ApiError, SynthesisError},
    state::AppState,
};

/// Query string of the TTS endpoints
#[derive(Debug, Default)]
pub struct SpeechQuery {
    /// Text to speak
    pub text: Option<String>,
}

impl SpeechQuery {
    /// Build from decoded query pairs, the first `text` wins
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            text: pairs
                .into_iter()
                .find_map(|(key, value)| (key == "text").then_some(value)),
        }
    }

    /// The text, if it is not blank
    fn non_blank_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

async fn speak(tts: &dyn TextToSpeech, query: &SpeechQuery) -> Result<Response, SynthesisError> {
    let text = query.non_blank_text().ok_or(ApiError::EmptyInput)?;

    debug!(text_len = text.len(), "Synthesizing speech");

    let audio = tts.synthesize(text).await?;
    debug!(
        model = tts.model_name(),
        audio_size = audio.size_bytes(),
        "Speech synthesized"
    );

    Ok(([(CONTENT_TYPE, audio.mime_type())], audio.into_data()).into_response())
}

/// Synthesize with Google Translate TTS
#[instrument(skip_all)]
pub async fn translate_tts(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, SynthesisError> {
    speak(state.translate_tts.as_ref(), &SpeechQuery::from_pairs(pairs)).await
}

/// Synthesize with the neural TTS model
#[instrument(skip_all)]
pub async fn neural_tts(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, SynthesisError> {
    speak(state.neural_tts.as_ref(), &SpeechQuery::from_pairs(pairs)).await
}
