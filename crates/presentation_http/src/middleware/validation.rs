//! Willow stream header validation
//!
//! Provides the `WillowHeaders` extractor. It runs on request parts only, so a
//! rejected upload is answered before its body is read.

use std::str::FromStr;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue,
        header::{CONTENT_LENGTH, USER_AGENT},
        request::Parts,
    },
};

use crate::{
    error::{ApiError, TranscriptionError},
    state::AppState,
};

/// Channel count header
pub const AUDIO_CHANNEL_HEADER: &str = "x-audio-channel";
/// Sample rate header
pub const AUDIO_SAMPLE_RATE_HEADER: &str = "x-audio-sample-rate";
/// Bit depth header
pub const AUDIO_BITS_HEADER: &str = "x-audio-bits";
/// Codec header
pub const AUDIO_CODEC_HEADER: &str = "x-audio-codec";

const REQUIRED_STREAM_HEADERS: [&str; 4] = [
    AUDIO_CHANNEL_HEADER,
    AUDIO_SAMPLE_RATE_HEADER,
    AUDIO_BITS_HEADER,
    AUDIO_CODEC_HEADER,
];

/// Typed stream parameters declared by a Willow device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeaders {
    /// Interleaved channel count
    pub channel_count: u16,
    /// Samples per second
    pub sample_rate_hz: u32,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Payload length from `content-length`, when sent
    pub declared_length: Option<u32>,
}

/// Check a Willow upload's headers, first failure wins
///
/// Order: user-agent, presence of the four `x-audio-*` headers, codec, then
/// numeric parsing.
pub fn validate_stream_headers(
    headers: &HeaderMap,
    device_token: &str,
) -> Result<StreamHeaders, ApiError> {
    let from_device = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ua| ua.contains(device_token));
    if !from_device {
        return Err(ApiError::InvalidClient {
            token: device_token.to_string(),
        });
    }

    if REQUIRED_STREAM_HEADERS
        .iter()
        .any(|name| !headers.contains_key(*name))
    {
        return Err(ApiError::MissingStreamMetadata);
    }

    let is_pcm = headers
        .get(AUDIO_CODEC_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|codec| codec.contains("pcm"));
    if !is_pcm {
        return Err(ApiError::UnsupportedCodec);
    }

    let declared_length = match headers.get(CONTENT_LENGTH) {
        Some(value) => Some(parse_value(CONTENT_LENGTH.as_str(), value)?),
        None => None,
    };

    Ok(StreamHeaders {
        channel_count: parse_header(headers, AUDIO_CHANNEL_HEADER)?,
        sample_rate_hz: parse_header(headers, AUDIO_SAMPLE_RATE_HEADER)?,
        bits_per_sample: parse_header(headers, AUDIO_BITS_HEADER)?,
        declared_length,
    })
}

fn parse_header<T: FromStr>(headers: &HeaderMap, name: &'static str) -> Result<T, ApiError> {
    headers
        .get(name)
        .ok_or(ApiError::MissingStreamMetadata)
        .and_then(|value| parse_value(name, value))
}

fn parse_value<T: FromStr>(name: &'static str, value: &HeaderValue) -> Result<T, ApiError> {
    value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| ApiError::InvalidStreamMetadata {
            header: name,
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        })
}

/// Extractor yielding validated [`StreamHeaders`]
///
/// Place it before any body extractor in the handler signature.
///
/// # Example
///
/// ```ignore
/// async fn handler(WillowHeaders(stream): WillowHeaders, body: Bytes) {
///     // stream.sample_rate_hz etc. are parsed and checked
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WillowHeaders(pub StreamHeaders);

impl FromRequestParts<AppState> for WillowHeaders {
    type Rejection = TranscriptionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        validate_stream_headers(&parts.headers, &state.config.device.user_agent_token)
            .map(Self)
            .map_err(TranscriptionError)
    }
}
