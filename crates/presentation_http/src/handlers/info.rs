//! Service summary at `/`

/// Plain-text list of the available endpoints
pub const SERVICE_SUMMARY: &str = "Willow Speech Services - Available endpoints: \
POST /api/willow (STT), GET /api/tts?text=hello (TTS), GET /api/melotts?text=hello (TTS)";

/// Describe the service
pub async fn index() -> &'static str {
    SERVICE_SUMMARY
}
