//! Willow speech gateway HTTP presentation layer
//!
//! Bridges Willow voice-assistant devices to speech backends: raw PCM
//! uploads are wrapped in WAV and transcribed, short texts are turned into
//! MP3.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{AppConfig, LogFormat};
pub use error::{ApiError, SynthesisError, TranscriptionError};
pub use middleware::{RequestIdLayer, WillowHeaders};
pub use routes::create_router;
pub use state::AppState;
