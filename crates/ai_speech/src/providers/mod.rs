//! Speech processing provider implementations
//!
//! Contains concrete implementations of the `SpeechToText` and `TextToSpeech` traits.

pub mod google_translate;
pub mod workers_ai;

pub use google_translate::GoogleTranslateTtsProvider;
pub use workers_ai::WorkersAiProvider;
