//! Willow speech-to-text endpoint
//!
//! `POST /api/willow` receives headerless PCM from a Willow device, wraps it
//! in a WAV container and forwards it to the transcription backend.

use ai_speech::{AudioData, AudioFormat, Transcription};
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use domain::{AssembledAudioBuffer, AudioStreamDescriptor, ContainerHeader, DomainError};
use tracing::{debug, instrument, warn};

use crate::{
    error::{ApiError, TranscriptionError},
    middleware::{StreamHeaders, WillowHeaders},
    state::AppState,
};

/// Pick the payload length written into the container header
fn payload_length(
    stream: &StreamHeaders,
    received: usize,
    strict: bool,
) -> Result<u32, TranscriptionError> {
    let received_len = u32::try_from(received)
        .map_err(|_| DomainError::invalid_descriptor("payload exceeds 4 GiB"))?;

    match stream.declared_length {
        Some(declared) if declared != received_len => {
            if strict {
                return Err(ApiError::PayloadLengthMismatch {
                    declared,
                    actual: received,
                }
                .into());
            }
            warn!(
                declared,
                received, "content-length disagrees with body, using body length"
            );
            Ok(received_len)
        },
        _ => Ok(received_len),
    }
}

/// Build the WAV file for an upload
pub fn assemble_upload(
    stream: &StreamHeaders,
    payload: &[u8],
    strict: bool,
) -> Result<AssembledAudioBuffer, TranscriptionError> {
    let payload_len = payload_length(stream, payload.len(), strict)?;
    let descriptor = AudioStreamDescriptor::new(
        stream.channel_count,
        stream.sample_rate_hz,
        stream.bits_per_sample,
        payload_len,
    )?;
    debug!(%descriptor, duration_ms = descriptor.duration_ms(), "Synthesizing WAV header");

    let header = ContainerHeader::synthesize(&descriptor);
    Ok(AssembledAudioBuffer::assemble(&header, payload)?)
}

/// Transcribe a Willow upload
///
/// Headers are validated by [`WillowHeaders`] before the body is read.
/// Body read failures, such as exceeding the upload limit, are answered in
/// the same format as every other rejection.
#[instrument(
    skip_all,
    fields(
        channels = stream.channel_count,
        sample_rate = stream.sample_rate_hz,
        bits = stream.bits_per_sample,
    )
)]
pub async fn transcribe(
    State(state): State<AppState>,
    WillowHeaders(stream): WillowHeaders,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Transcription>, TranscriptionError> {
    let body = body?;
    debug!(body_len = body.len(), "Upload received");

    let wav = assemble_upload(&stream, &body, state.config.device.strict_payload_length)?;

    let transcription = state
        .transcriber
        .transcribe(AudioData::new(wav.into_bytes(), AudioFormat::Wav))
        .await?;

    debug!(text_len = transcription.text.len(), "Upload transcribed");

    Ok(Json(transcription))
}
