//! Port definitions for speech processing
//!
//! Defines the traits (ports) that vendor adapters implement. The registry
//! dispatches to these as trait objects, so both ports are object-safe.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, Transcription};

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech
    ///
    /// # Arguments
    ///
    /// * `text` - Text to synthesize
    /// * `voice` - Optional voice id (vendor default when `None`)
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioData, SpeechError>;

    /// Stable identifier this adapter is registered under
    fn provider_id(&self) -> &'static str;
}

/// Port for Speech-to-Text (STT) implementations
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - Audio data to transcribe
    /// * `language` - Optional ISO 639-1 language hint (e.g. "en", "de")
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if transcription fails.
    async fn transcribe(
        &self,
        audio: AudioData,
        language: Option<&str>,
    ) -> Result<Transcription, SpeechError>;

    /// Stable identifier this adapter is registered under
    fn provider_id(&self) -> &'static str;
}
