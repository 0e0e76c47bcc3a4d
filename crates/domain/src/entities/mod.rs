//! Domain entities

mod assembled_audio;
mod container_header;

pub use assembled_audio::AssembledAudioBuffer;
pub use container_header::{ContainerHeader, HEADER_LEN};
