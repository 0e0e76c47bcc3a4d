//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use ai_speech::{AudioData, AudioFormat, SpeechError, SpeechToText, TextToSpeech, Transcription};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{HeaderName, HeaderValue, Request, StatusCode, header::CONTENT_TYPE},
};
use axum_test::TestServer;
use presentation_http::{AppConfig, AppState, create_router, handlers::health::HealthResponse};
use tower::ServiceExt;

const PCM_320: &[u8] = &[0x2a; 320];
const FAKE_MP3: &[u8] = b"ID3\x04\x00fake-mp3";

/// Transcriber that records the WAV it was handed
#[derive(Default)]
struct MockTranscriber {
    received: Mutex<Option<Vec<u8>>>,
    fail: bool,
}

impl MockTranscriber {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn received(&self) -> Option<Vec<u8>> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechToText for MockTranscriber {
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        if self.fail {
            return Err(SpeechError::UpstreamStatus {
                service: "Workers AI",
                status: 503,
            });
        }
        assert_eq!(audio.format(), AudioFormat::Wav);
        *self.received.lock().unwrap() = Some(audio.into_data());
        Ok(Transcription::new("turn on the kitchen lights"))
    }

    fn model_name(&self) -> &str {
        "mock-whisper"
    }
}

/// Synthesizer that records the text it was asked to speak
struct MockSynthesizer {
    name: &'static str,
    spoken: Mutex<Option<String>>,
    fail: bool,
}

impl MockSynthesizer {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            spoken: Mutex::new(None),
            fail: false,
        })
    }

    fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            spoken: Mutex::new(None),
            fail: true,
        })
    }

    fn spoken(&self) -> Option<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextToSpeech for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError> {
        assert!(!text.trim().is_empty(), "blank text reached the backend");
        if self.fail {
            return Err(SpeechError::ConnectionFailed("backend down".to_string()));
        }
        *self.spoken.lock().unwrap() = Some(text.to_string());
        Ok(AudioData::new(FAKE_MP3.to_vec(), AudioFormat::Mp3))
    }

    fn model_name(&self) -> &str {
        self.name
    }
}

struct Backends {
    transcriber: Arc<MockTranscriber>,
    translate_tts: Arc<MockSynthesizer>,
    neural_tts: Arc<MockSynthesizer>,
}

impl Default for Backends {
    fn default() -> Self {
        Self {
            transcriber: Arc::new(MockTranscriber::default()),
            translate_tts: MockSynthesizer::new("mock-google"),
            neural_tts: MockSynthesizer::new("mock-melotts"),
        }
    }
}

fn create_app(backends: Backends, config: AppConfig) -> Router {
    let state = AppState {
        transcriber: backends.transcriber,
        translate_tts: backends.translate_tts,
        neural_tts: backends.neural_tts,
        config: Arc::new(config),
    };
    create_router(state)
}

fn create_test_server(backends: Backends) -> TestServer {
    TestServer::new(create_app(backends, AppConfig::default()))
        .expect("Failed to create test server")
}

fn header(name: &'static str, value: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

fn willow_headers() -> Vec<(HeaderName, HeaderValue)> {
    vec![
        header("user-agent", "WillowDevice/1.0"),
        header("x-audio-channel", "1"),
        header("x-audio-sample-rate", "16000"),
        header("x-audio-bits", "16"),
        header("x-audio-codec", "pcm"),
    ]
}

async fn post_willow(
    server: &TestServer,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: &'static [u8],
) -> axum_test::TestResponse {
    let mut request = server.post("/api/willow");
    for (name, value) in headers {
        request = request.add_header(name, value);
    }
    request.bytes(Bytes::from_static(body)).await
}

fn willow_request(content_length: &str, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/api/willow");
    for (name, value) in willow_headers() {
        builder = builder.header(name, value);
    }
    builder
        .header("content-length", content_length)
        .body(body)
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// Service endpoints

#[tokio::test]
async fn index_lists_endpoints() {
    let server = create_test_server(Backends::default());

    let response = server.get("/").await;

    response.assert_status_ok();
    response.assert_text(
        "Willow Speech Services - Available endpoints: POST /api/willow (STT), \
         GET /api/tts?text=hello (TTS), GET /api/melotts?text=hello (TTS)",
    );
}

#[tokio::test]
async fn health_check_returns_ok() {
    let server = create_test_server(Backends::default());

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: HealthResponse = response.json();
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let server = create_test_server(Backends::default());

    let response = server.get("/api/whisper").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn response_carries_request_id_when_layered() {
    let app = create_app(Backends::default(), AppConfig::default())
        .layer(presentation_http::RequestIdLayer);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

// Speech-to-text

#[tokio::test]
async fn willow_upload_is_transcribed() {
    let backends = Backends::default();
    let transcriber = Arc::clone(&backends.transcriber);
    let server = create_test_server(backends);

    let response = post_willow(&server, willow_headers(), PCM_320).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(
        body,
        serde_json::json!({"language": "en", "text": "turn on the kitchen lights"})
    );

    let wav = transcriber.received().expect("backend was not called");
    assert_eq!(wav.len(), 364);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[4..8], &356u32.to_le_bytes());
    assert_eq!(&wav[22..24], &1u16.to_le_bytes());
    assert_eq!(&wav[24..28], &16_000u32.to_le_bytes());
    assert_eq!(&wav[28..32], &32_000u32.to_le_bytes());
    assert_eq!(&wav[34..36], &16u16.to_le_bytes());
    assert_eq!(&wav[40..44], &320u32.to_le_bytes());
    assert_eq!(&wav[44..], PCM_320);
}

#[tokio::test]
async fn stereo_upload_header_matches_stream() {
    let backends = Backends::default();
    let transcriber = Arc::clone(&backends.transcriber);
    let server = create_test_server(backends);

    let mut headers = willow_headers();
    headers[1] = header("x-audio-channel", "2");
    headers[2] = header("x-audio-sample-rate", "44100");
    let response = post_willow(&server, headers, PCM_320).await;

    response.assert_status_ok();
    let wav = transcriber.received().unwrap();
    assert_eq!(&wav[28..32], &176_400u32.to_le_bytes());
    assert_eq!(&wav[32..34], &4u16.to_le_bytes());
}

#[tokio::test]
async fn each_missing_stream_header_is_rejected() {
    for missing in [
        "x-audio-channel",
        "x-audio-sample-rate",
        "x-audio-bits",
        "x-audio-codec",
    ] {
        let backends = Backends::default();
        let transcriber = Arc::clone(&backends.transcriber);
        let server = create_test_server(backends);

        let headers = willow_headers()
            .into_iter()
            .filter(|(name, _)| name != missing)
            .collect();
        let response = post_willow(&server, headers, PCM_320).await;

        response.assert_status_bad_request();
        response.assert_text("Error processing the file. - Bad header data received.");
        assert!(transcriber.received().is_none(), "backend called without {missing}");
    }
}

#[tokio::test]
async fn foreign_user_agent_is_rejected() {
    let server = create_test_server(Backends::default());

    let mut headers = willow_headers();
    headers[0] = header("user-agent", "curl/8.5.0");
    let response = post_willow(&server, headers, PCM_320).await;

    response.assert_status_bad_request();
    response.assert_text("Error processing the file. - Bad user-agent received (not Willow).");
}

#[tokio::test]
async fn non_pcm_codec_is_rejected() {
    let server = create_test_server(Backends::default());

    let mut headers = willow_headers();
    headers[4] = header("x-audio-codec", "amr-wb");
    let response = post_willow(&server, headers, PCM_320).await;

    response.assert_status_bad_request();
    response.assert_text("Error processing the file. - Only PCM codec accepted.");
}

#[tokio::test]
async fn unparseable_sample_rate_is_rejected() {
    let server = create_test_server(Backends::default());

    let mut headers = willow_headers();
    headers[2] = header("x-audio-sample-rate", "sixteen-k");
    let response = post_willow(&server, headers, PCM_320).await;

    response.assert_status_bad_request();
    assert!(response.text().contains("x-audio-sample-rate"));
}

#[tokio::test]
async fn rejected_upload_body_is_never_read() {
    let polled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&polled);
    let body = Body::from_stream(futures::stream::once(async move {
        flag.store(true, Ordering::SeqCst);
        Ok::<_, std::io::Error>(Bytes::from_static(PCM_320))
    }));

    let request = Request::builder()
        .method("POST")
        .uri("/api/willow")
        .header("user-agent", "WillowDevice/1.0")
        .header("x-audio-codec", "pcm")
        .body(body)
        .unwrap();

    let response = create_app(Backends::default(), AppConfig::default())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!polled.load(Ordering::SeqCst), "body was consumed");
}

#[tokio::test]
async fn content_length_mismatch_rejected_in_strict_mode() {
    let response = create_app(Backends::default(), AppConfig::default())
        .oneshot(willow_request("320", Body::from(vec![0u8; 100])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .starts_with("Error processing the file. - Payload length mismatch")
    );
}

#[tokio::test]
async fn content_length_mismatch_tolerated_in_lenient_mode() {
    let backends = Backends::default();
    let transcriber = Arc::clone(&backends.transcriber);
    let mut config = AppConfig::default();
    config.device.strict_payload_length = false;

    let response = create_app(backends, config)
        .oneshot(willow_request("320", Body::from(vec![0u8; 100])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let wav = transcriber.received().unwrap();
    assert_eq!(&wav[40..44], &100u32.to_le_bytes());
    assert_eq!(wav.len(), 144);
}

#[tokio::test]
async fn transcription_backend_failure_is_server_error() {
    let server = create_test_server(Backends {
        transcriber: Arc::new(MockTranscriber::failing()),
        ..Backends::default()
    });

    let response = post_willow(&server, willow_headers(), PCM_320).await;

    response.assert_status_internal_server_error();
    let text = response.text();
    assert!(text.starts_with("Error processing the file. - "));
    assert!(text.contains("503"));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_body_size_audio_bytes = 64;
    let server = TestServer::new(create_app(Backends::default(), config)).unwrap();

    let response = post_willow(&server, willow_headers(), PCM_320).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response.text().starts_with("Error processing the file. - "));
}

#[tokio::test]
async fn oversized_upload_with_declared_length_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_body_size_audio_bytes = 64;

    let response = create_app(Backends::default(), config)
        .oneshot(willow_request("320", Body::from(PCM_320)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(
        body_text(response)
            .await
            .starts_with("Error processing the file. - ")
    );
}

// Text-to-speech

#[tokio::test]
async fn tts_returns_mp3() {
    let server = create_test_server(Backends::default());

    let response = server.get("/api/tts").add_query_param("text", "hello").await;

    response.assert_status_ok();
    response.assert_header(CONTENT_TYPE, "audio/mpeg");
    assert_eq!(response.as_bytes().as_ref(), FAKE_MP3);
}

#[tokio::test]
async fn melotts_returns_mp3() {
    let server = create_test_server(Backends::default());

    let response = server
        .get("/api/melotts")
        .add_query_param("text", "good morning")
        .await;

    response.assert_status_ok();
    response.assert_header(CONTENT_TYPE, "audio/mpeg");
    assert_eq!(response.as_bytes().as_ref(), FAKE_MP3);
}

#[tokio::test]
async fn repeated_text_parameter_speaks_first_value() {
    let backends = Backends::default();
    let translate_tts = Arc::clone(&backends.translate_tts);
    let neural_tts = Arc::clone(&backends.neural_tts);
    let server = create_test_server(backends);

    server
        .get("/api/tts?text=hello&text=world")
        .await
        .assert_status_ok();
    server
        .get("/api/melotts?text=good%20morning&text=world")
        .await
        .assert_status_ok();

    assert_eq!(translate_tts.spoken().as_deref(), Some("hello"));
    assert_eq!(neural_tts.spoken().as_deref(), Some("good morning"));
}

#[tokio::test]
async fn tts_passes_text_unchanged() {
    let backends = Backends::default();
    let translate_tts = Arc::clone(&backends.translate_tts);
    let server = create_test_server(backends);

    server
        .get("/api/tts")
        .add_query_param("lang", "de")
        .add_query_param("text", "Grüß dich & tschüss")
        .await
        .assert_status_ok();

    assert_eq!(translate_tts.spoken().as_deref(), Some("Grüß dich & tschüss"));
}

#[tokio::test]
async fn tts_without_text_is_rejected() {
    let server = create_test_server(Backends::default());

    for path in ["/api/tts", "/api/tts?text=", "/api/melotts", "/api/melotts?text=%20"] {
        let response = server.get(path).await;

        response.assert_status_bad_request();
        response.assert_text("Missing required parameter: text");
    }
}

#[tokio::test]
async fn tts_backend_failure_is_server_error() {
    let server = create_test_server(Backends {
        translate_tts: MockSynthesizer::failing("mock-google"),
        neural_tts: MockSynthesizer::failing("mock-melotts"),
        ..Backends::default()
    });

    for path in ["/api/tts", "/api/melotts"] {
        let response = server.get(path).add_query_param("text", "hello").await;

        response.assert_status_internal_server_error();
        assert!(response.text().starts_with("Error generating speech: "));
    }
}

#[tokio::test]
async fn tts_routes_use_their_own_backend() {
    let server = create_test_server(Backends {
        translate_tts: MockSynthesizer::failing("mock-google"),
        ..Backends::default()
    });

    server
        .get("/api/tts")
        .add_query_param("text", "hi")
        .await
        .assert_status_internal_server_error();
    server
        .get("/api/melotts")
        .add_query_param("text", "hi")
        .await
        .assert_status_ok();
}
