//! ElevenLabs TTS adapter
//!
//! Implements `TextToSpeech` against `POST /v1/text-to-speech/{voice_id}`.
//! The API authenticates with an `xi-api-key` header and returns MP3 bytes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ElevenLabsConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, AudioFormat};

/// ElevenLabs TTS adapter
#[derive(Debug, Clone)]
pub struct ElevenLabsTts {
    client: Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsTts {
    /// Create a new ElevenLabs adapter
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: ElevenLabsConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn synthesis_url(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{voice_id}", self.config.base_url)
    }
}

/// Synthesis request body
#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    detail: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    status: String,
    message: String,
}

#[async_trait]
impl TextToSpeech for ElevenLabsTts {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioData, SpeechError> {
        if text.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let voice_id = voice.unwrap_or(&self.config.default_voice);

        debug!(voice = %voice_id, "Synthesizing speech with ElevenLabs");

        let request = SynthesisRequest {
            text,
            model_id: &self.config.model_id,
        };

        let response = self
            .client
            .post(self.synthesis_url(voice_id))
            .header("xi-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return match api_error.detail.status.as_str() {
                    "voice_not_found" => Err(SpeechError::VoiceNotFound(voice_id.to_string())),
                    "too_many_concurrent_requests" | "system_busy" => {
                        Err(SpeechError::RateLimited)
                    },
                    _ => Err(SpeechError::SynthesisFailed(api_error.detail.message)),
                };
            }

            return Err(SpeechError::SynthesisFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let audio_bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        debug!(audio_size = audio_bytes.len(), "Speech synthesis complete");

        Ok(AudioData::new(audio_bytes.to_vec(), AudioFormat::Mp3))
    }

    fn provider_id(&self) -> &'static str {
        "elevenlabs"
    }
}
