//! Value Objects - Immutable, identity-less domain primitives

mod stream_descriptor;

pub use stream_descriptor::{AudioStreamDescriptor, RIFF_OVERHEAD};
