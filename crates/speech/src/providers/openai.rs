//! OpenAI speech adapter
//!
//! Implements `SpeechToText` via the Whisper transcription endpoint and
//! `TextToSpeech` via the speech endpoint.
//!
//! Whisper accepts mp3, wav, flac, webm, m4a and ogg uploads; opus payloads
//! must be re-containered by the caller first. TTS responses are MP3 unless
//! another response format is requested (this adapter always asks for MP3).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::OpenAiSpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{AudioData, AudioFormat, Transcription};

/// OpenAI TTS hard limit on input length
const MAX_TTS_CHARS: usize = 4096;

/// OpenAI speech adapter implementing both STT and TTS
#[derive(Debug, Clone)]
pub struct OpenAiSpeech {
    client: Client,
    config: OpenAiSpeechConfig,
}

impl OpenAiSpeech {
    /// Create a new OpenAI speech adapter
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: OpenAiSpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn transcription_url(&self) -> String {
        format!("{}/audio/transcriptions", self.config.base_url)
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.config.base_url)
    }

    /// Whether Whisper accepts this container without conversion
    const fn whisper_accepts(format: AudioFormat) -> bool {
        matches!(
            format,
            AudioFormat::Mp3
                | AudioFormat::Wav
                | AudioFormat::Flac
                | AudioFormat::Webm
                | AudioFormat::M4a
                | AudioFormat::Ogg
        )
    }

    /// Map a vendor error body to the common taxonomy, keeping the vendor's
    /// message where no specific variant applies.
    fn map_api_error(&self, body: &str, fallback: fn(String) -> SpeechError) -> SpeechError {
        if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
            return match api_error.error.code.as_deref() {
                Some("rate_limit_exceeded") => SpeechError::RateLimited,
                Some("model_not_found") => {
                    SpeechError::ModelNotAvailable(self.config.stt_model.clone())
                },
                Some("invalid_voice") => {
                    SpeechError::VoiceNotFound(self.config.default_voice.clone())
                },
                _ => fallback(api_error.error.message),
            };
        }
        fallback(body.to_string())
    }
}

/// Whisper transcription response
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// TTS request body
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// OpenAI API error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

#[async_trait]
impl SpeechToText for OpenAiSpeech {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), format = %audio.format()))]
    async fn transcribe(
        &self,
        audio: AudioData,
        language: Option<&str>,
    ) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }
        if !Self::whisper_accepts(audio.format()) {
            return Err(SpeechError::InvalidAudio(format!(
                "Audio format {} is not accepted by Whisper",
                audio.format()
            )));
        }

        debug!("Transcribing audio with OpenAI Whisper");

        let filename = audio.filename("audio");
        let mime_type = audio.mime_type();

        let file_part = Part::bytes(audio.into_data())
            .file_name(filename)
            .mime_str(mime_type)
            .map_err(|e| SpeechError::InvalidAudio(format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.config.stt_model.clone());
        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let response = self
            .client
            .post(self.transcription_url())
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.map_api_error(&body, SpeechError::TranscriptionFailed));
        }

        let whisper: WhisperResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(text_len = whisper.text.len(), "Transcription complete");

        let mut transcription = Transcription::new(whisper.text);
        if let Some(lang) = language.map(ToString::to_string).or(whisper.language) {
            transcription = transcription.with_language(lang);
        }
        if let Some(duration) = whisper.duration {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let duration_ms = (duration * 1000.0) as u64;
            transcription = transcription.with_duration(duration_ms);
        }

        Ok(transcription)
    }

    fn provider_id(&self) -> &'static str {
        "openai"
    }
}

#[async_trait]
impl TextToSpeech for OpenAiSpeech {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioData, SpeechError> {
        if text.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }
        if text.len() > MAX_TTS_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {} characters exceeds {MAX_TTS_CHARS} limit",
                text.len()
            )));
        }

        debug!("Synthesizing speech with OpenAI TTS");

        let request = SpeechRequest {
            model: &self.config.tts_model,
            input: text,
            voice: voice.unwrap_or(&self.config.default_voice),
            response_format: "mp3",
        };

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.map_api_error(&body, SpeechError::SynthesisFailed));
        }

        let audio_bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        debug!(audio_size = audio_bytes.len(), "Speech synthesis complete");

        Ok(AudioData::new(audio_bytes.to_vec(), AudioFormat::Mp3))
    }

    fn provider_id(&self) -> &'static str {
        "openai"
    }
}
