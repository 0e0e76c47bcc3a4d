//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let audio_limit = state.config.server.max_body_size_audio_bytes;

    Router::new()
        .route("/", get(handlers::info::index))
        .route("/health", get(handlers::health::health_check))
        // Speech-to-text for Willow devices
        .route(
            "/api/willow",
            post(handlers::willow::transcribe).layer(DefaultBodyLimit::max(audio_limit)),
        )
        // Text-to-speech
        .route("/api/tts", get(handlers::speech::translate_tts))
        .route("/api/melotts", get(handlers::speech::neural_tts))
        .with_state(state)
}
