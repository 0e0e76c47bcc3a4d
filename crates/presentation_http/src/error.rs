//! API error handling
//!
//! Willow devices and the TTS clients expect plain-text error
//! bodies. Each endpoint family wraps [`ApiError`] in its own response type
//! that adds the family's message prefix.

use ai_speech::SpeechError;
use axum::{
    extract::rejection::BytesRejection,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use domain::DomainError;
use thiserror::Error;
use tracing::{error, warn};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// `user-agent` missing or lacking the device token
    #[error("Bad user-agent received (not {token}).")]
    InvalidClient {
        /// Token the user-agent had to contain
        token: String,
    },

    /// One of the required `x-audio-*` headers is missing
    #[error("Bad header data received.")]
    MissingStreamMetadata,

    /// `x-audio-codec` is not PCM
    #[error("Only PCM codec accepted.")]
    UnsupportedCodec,

    /// A numeric stream header did not parse
    #[error("Bad header data received: {header} = '{value}'.")]
    InvalidStreamMetadata {
        /// Header name
        header: &'static str,
        /// Offending value, lossily decoded
        value: String,
    },

    /// Parsed stream parameters cannot describe a PCM stream
    #[error("Unsupported stream format: {0}.")]
    UnsupportedStreamFormat(String),

    /// Declared and received payload lengths differ
    #[error("Payload length mismatch: content-length declares {declared} bytes, received {actual}.")]
    PayloadLengthMismatch {
        /// Length declared by the request
        declared: u32,
        /// Bytes actually received
        actual: usize,
    },

    /// Upload body could not be buffered, e.g. it exceeds the size limit
    #[error("{message}")]
    UnreadableBody {
        /// Status chosen by the body extractor
        status: StatusCode,
        /// Extractor message
        message: String,
    },

    /// No text to synthesize
    #[error("Missing required parameter: text")]
    EmptyInput,

    /// Speech backend failed
    #[error("{0}")]
    BackendUnavailable(String),
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BackendUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnreadableBody { status, .. } => *status,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn log(&self) {
        if self.status_code().is_server_error() {
            error!(error = %self, "Speech backend failed");
        } else {
            warn!(error = %self, "Rejected request");
        }
    }
}

fn plain_text(status: StatusCode, body: String) -> Response {
    (status, [(CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        plain_text(self.status_code(), self.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::PayloadLengthMismatch { declared, actual } => {
                Self::PayloadLengthMismatch { declared, actual }
            },
            DomainError::InvalidStreamDescriptor(reason) => Self::UnsupportedStreamFormat(reason),
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::EmptyInput => Self::EmptyInput,
            other => Self::BackendUnavailable(other.to_string()),
        }
    }
}

/// Error response for `POST /api/willow`
///
/// Body: `Error processing the file. - <message>`.
#[derive(Debug)]
pub struct TranscriptionError(pub ApiError);

impl IntoResponse for TranscriptionError {
    fn into_response(self) -> Response {
        self.0.log();
        plain_text(
            self.0.status_code(),
            format!("Error processing the file. - {}", self.0),
        )
    }
}

impl From<ApiError> for TranscriptionError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for TranscriptionError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl From<BytesRejection> for TranscriptionError {
    fn from(rejection: BytesRejection) -> Self {
        Self(ApiError::UnreadableBody {
            status: rejection.status(),
            message: rejection.body_text(),
        })
    }
}

impl From<SpeechError> for TranscriptionError {
    fn from(err: SpeechError) -> Self {
        Self(err.into())
    }
}

/// Error response for the TTS endpoints
///
/// Client errors carry their own message, backend failures are prefixed with
/// `Error generating speech: `.
#[derive(Debug)]
pub struct SynthesisError(pub ApiError);

impl IntoResponse for SynthesisError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            self.0.log();
            return plain_text(status, format!("Error generating speech: {}", self.0));
        }
        self.0.into_response()
    }
}

impl From<ApiError> for SynthesisError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<SpeechError> for SynthesisError {
    fn from(err: SpeechError) -> Self {
        Self(err.into())
    }
}
