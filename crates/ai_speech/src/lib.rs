//! AI Speech - Speech-to-Text and Text-to-Speech abstractions
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - Transcribe audio to text (STT)
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - Cloudflare Workers AI: Whisper (STT) and MeloTTS (TTS)
//! - Google Translate TTS
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{WorkersAiProvider, SpeechToText, TextToSpeech, AudioData, AudioFormat};
//!
//! let provider = WorkersAiProvider::new(config)?;
//!
//! // Transcribe a WAV file
//! let audio = AudioData::new(wav_bytes, AudioFormat::Wav);
//! let transcription = provider.transcribe(audio).await?;
//!
//! // Synthesize speech
//! let mp3 = provider.synthesize("Hello, world!").await?;
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::{GoogleTranslateTtsProvider, WorkersAiProvider};
pub use types::{AudioData, AudioFormat, DEFAULT_LANGUAGE, Transcription};
