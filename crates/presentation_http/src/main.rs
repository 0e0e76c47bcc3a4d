//! Willow speech gateway
//!
//! Main entry point for the HTTP server.

use std::{sync::Arc, time::Duration};

use ai_speech::{GoogleTranslateTtsProvider, SpeechToText, TextToSpeech, WorkersAiProvider};
use axum::http::{HeaderValue, Method};
use presentation_http::{AppConfig, AppState, LogFormat, RequestIdLayer, routes};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str =
    "willow_gateway=debug,presentation_http=debug,ai_speech=debug,tower_http=debug";

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config is read before logging so the log format can be honoured
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(config.server.log_format);

    info!("Willow speech gateway v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        host = %config.server.host,
        port = %config.server.port,
        stt_model = %config.speech.stt_model,
        tts_model = %config.speech.tts_model,
        "Configuration loaded"
    );

    // One Workers AI client serves both transcription and neural TTS
    let workers_ai = Arc::new(
        WorkersAiProvider::new(config.speech.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize Workers AI: {e}"))?,
    );
    let google_tts = GoogleTranslateTtsProvider::new(config.speech.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize Google TTS: {e}"))?;

    let transcriber: Arc<dyn SpeechToText> = workers_ai.clone();
    let neural_tts: Arc<dyn TextToSpeech> = workers_ai;

    let config = Arc::new(config);
    let state = AppState {
        transcriber,
        translate_tts: Arc::new(google_tts),
        neural_tts,
        config: Arc::clone(&config),
    };

    // Layers wrap outwards: request ids are assigned before tracing starts
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.allowed_origins))
        .layer(RequestIdLayer);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }

    // Hard stop if in-flight requests outlive the grace period
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!("Connections still open after {:?}, exiting", timeout);
        std::process::exit(1);
    });
}
