//! Speech processing errors

use thiserror::Error;

/// Errors that can occur during speech processing
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No adapter registered under the requested provider id
    #[error("Unknown speech provider: {0}")]
    ProviderNotFound(String),

    /// Failed to connect to the vendor service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the vendor service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Invalid audio format or corrupted data
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Transcription failed
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Vendor response could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during processing
    #[error("Speech processing timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Voice not found
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_not_found_message() {
        let err = SpeechError::ProviderNotFound("acme".to_string());
        assert_eq!(err.to_string(), "Unknown speech provider: acme");
    }

    #[test]
    fn transcription_failed_message() {
        let err = SpeechError::TranscriptionFailed("no speech detected".to_string());
        assert_eq!(err.to_string(), "Transcription failed: no speech detected");
    }

    #[test]
    fn synthesis_failed_message() {
        let err = SpeechError::SynthesisFailed("invalid text".to_string());
        assert_eq!(err.to_string(), "Synthesis failed: invalid text");
    }

    #[test]
    fn timeout_message() {
        let err = SpeechError::Timeout(30000);
        assert_eq!(err.to_string(), "Speech processing timeout after 30000ms");
    }

    #[test]
    fn rate_limited_message() {
        assert_eq!(SpeechError::RateLimited.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn voice_not_found_message() {
        let err = SpeechError::VoiceNotFound("custom-voice".to_string());
        assert_eq!(err.to_string(), "Voice not found: custom-voice");
    }
}
