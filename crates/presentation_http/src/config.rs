//! Application configuration
//!
//! Layered as defaults, then an optional `config.toml`, then environment
//! variables such as `WILLOW_SERVER__PORT` or `WILLOW_SPEECH__CLOUDFLARE_API_TOKEN`.

use ai_speech::SpeechConfig;
use serde::{Deserialize, Serialize};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WILLOW";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Willow device protocol settings
    #[serde(default)]
    pub device: DeviceConfig,

    /// Speech backend configuration
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Structured JSON, one object per line
    Json,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins (empty = allow all)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Graceful shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,

    /// Log format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Largest accepted audio upload in bytes
    #[serde(default = "default_max_body_size_audio_bytes")]
    pub max_body_size_audio_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_shutdown_timeout_secs() -> u64 {
    30
}

const fn default_max_body_size_audio_bytes() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            log_format: LogFormat::default(),
            max_body_size_audio_bytes: default_max_body_size_audio_bytes(),
        }
    }
}

/// Willow device protocol settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Substring the `user-agent` header must contain
    #[serde(default = "default_user_agent_token")]
    pub user_agent_token: String,

    /// Reject uploads whose `content-length` disagrees with the received body.
    /// When false the header is built from the received body length.
    #[serde(default = "default_strict_payload_length")]
    pub strict_payload_length: bool,
}

fn default_user_agent_token() -> String {
    "Willow".to_string()
}

const fn default_strict_payload_length() -> bool {
    true
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            user_agent_token: default_user_agent_token(),
            strict_payload_length: default_strict_payload_length(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration using `file` (extension optional) as the file layer
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            // e.g. WILLOW_SERVER__PORT=8080
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }

        if self.server.max_body_size_audio_bytes == 0 {
            return Err("server.max_body_size_audio_bytes must be greater than 0".to_string());
        }

        if self.device.user_agent_token.trim().is_empty() {
            return Err("device.user_agent_token cannot be empty".to_string());
        }

        self.speech
            .validate()
            .map_err(|e| format!("speech: {e}"))
    }

    /// Socket address string to bind to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
