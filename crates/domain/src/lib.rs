//! Domain layer for the Willow speech gateway
//!
//! Models the raw PCM stream a Willow device uploads and the RIFF/WAVE
//! container wrapped around it before transcription. Pure and synchronous,
//! with no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
