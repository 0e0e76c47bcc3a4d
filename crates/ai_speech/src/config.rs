//! Configuration for speech processing

use serde::{Deserialize, Serialize};

/// Configuration for the speech backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Cloudflare account that owns the Workers AI models
    #[serde(default)]
    pub cloudflare_account_id: Option<String>,

    /// API token with Workers AI access
    #[serde(default)]
    pub cloudflare_api_token: Option<String>,

    /// Workers AI REST base URL
    #[serde(default = "default_workers_ai_base_url")]
    pub workers_ai_base_url: String,

    /// Speech-to-text model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Neural text-to-speech model
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Language passed to the neural TTS model
    #[serde(default = "default_tts_language")]
    pub tts_language: String,

    /// Google Translate TTS endpoint
    #[serde(default = "default_google_tts_url")]
    pub google_tts_url: String,

    /// Language passed to Google Translate TTS
    #[serde(default = "default_google_tts_language")]
    pub google_tts_language: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_workers_ai_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_stt_model() -> String {
    "@cf/openai/whisper".to_string()
}

fn default_tts_model() -> String {
    "@cf/myshell-ai/melotts".to_string()
}

fn default_tts_language() -> String {
    "en".to_string()
}

fn default_google_tts_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_google_tts_language() -> String {
    "en-US".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            cloudflare_account_id: None,
            cloudflare_api_token: None,
            workers_ai_base_url: default_workers_ai_base_url(),
            stt_model: default_stt_model(),
            tts_model: default_tts_model(),
            tts_language: default_tts_language(),
            google_tts_url: default_google_tts_url(),
            google_tts_language: default_google_tts_language(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            cloudflare_account_id: Some("test-account".to_string()),
            cloudflare_api_token: Some("test-token".to_string()),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// Credentials are not checked here since only the Workers AI backend
    /// needs them; see [`SpeechConfig::workers_ai_credentials`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [
            ("workers_ai_base_url", &self.workers_ai_base_url),
            ("google_tts_url", &self.google_tts_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{name} must be an http(s) URL, got '{url}'"));
            }
        }

        if self.stt_model.trim().is_empty() || self.tts_model.trim().is_empty() {
            return Err("Model names cannot be empty".to_string());
        }

        if self.tts_language.trim().is_empty() || self.google_tts_language.trim().is_empty() {
            return Err("TTS languages cannot be empty".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Account id and API token for Workers AI
    ///
    /// # Errors
    ///
    /// Returns an error naming the missing setting.
    pub fn workers_ai_credentials(&self) -> Result<(&str, &str), String> {
        let account = self
            .cloudflare_account_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "Cloudflare account id is required for Workers AI".to_string())?;
        let token = self
            .cloudflare_api_token
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "Cloudflare API token is required for Workers AI".to_string())?;
        Ok((account, token))
    }
}
