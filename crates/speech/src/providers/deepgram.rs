//! Deepgram STT adapter
//!
//! Implements `SpeechToText` against `POST /v1/listen`. The audio bytes go in
//! the request body with their MIME type; model and language travel as query
//! parameters; auth is a `Token` authorization header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::DeepgramConfig;
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::types::{AudioData, Transcription};

/// Deepgram STT adapter
#[derive(Debug, Clone)]
pub struct DeepgramStt {
    client: Client,
    config: DeepgramConfig,
}

impl DeepgramStt {
    /// Create a new Deepgram adapter
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: DeepgramConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn listen_url(&self) -> String {
        format!("{}/v1/listen", self.config.base_url)
    }
}

/// Deepgram response envelope (only the fields this adapter reads)
#[derive(Debug, Deserialize)]
struct ListenResponse {
    metadata: ListenMetadata,
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenMetadata {
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    channels: Vec<ListenChannel>,
}

#[derive(Debug, Deserialize)]
struct ListenChannel {
    alternatives: Vec<ListenAlternative>,
}

#[derive(Debug, Deserialize)]
struct ListenAlternative {
    transcript: String,
    #[serde(default)]
    confidence: Option<f32>,
}

#[async_trait]
impl SpeechToText for DeepgramStt {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), format = %audio.format()))]
    async fn transcribe(
        &self,
        audio: AudioData,
        language: Option<&str>,
    ) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        debug!("Transcribing audio with Deepgram");

        let mut query: Vec<(&str, &str)> = vec![("model", &self.config.model)];
        if let Some(lang) = language {
            query.push(("language", lang));
        }

        let mime_type = audio.mime_type();
        let response = self
            .client
            .post(self.listen_url())
            .header("authorization", format!("Token {}", self.config.api_key))
            .header("content-type", mime_type)
            .query(&query)
            .body(audio.into_data())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SpeechError::RateLimited);
            }
            return Err(SpeechError::TranscriptionFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let listen: ListenResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let alternative = listen
            .results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .ok_or_else(|| {
                SpeechError::InvalidResponse("Response contains no transcript".to_string())
            })?;

        debug!(
            text_len = alternative.transcript.len(),
            "Transcription complete"
        );

        let mut transcription = Transcription::new(alternative.transcript.clone());
        if let Some(lang) = language {
            transcription = transcription.with_language(lang);
        }
        if let Some(confidence) = alternative.confidence {
            transcription = transcription.with_confidence(confidence);
        }
        if let Some(duration) = listen.metadata.duration {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let duration_ms = (duration * 1000.0) as u64;
            transcription = transcription.with_duration(duration_ms);
        }

        Ok(transcription)
    }

    fn provider_id(&self) -> &'static str {
        "deepgram"
    }
}
