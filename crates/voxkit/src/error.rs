//! Facade error type

use thiserror::Error;

/// Errors surfaced by the facade operations
#[derive(Debug, Error)]
pub enum VoxkitError {
    /// Speech synthesis or transcription failed
    #[error(transparent)]
    Speech(#[from] speech::SpeechError),

    /// Chat completion failed
    #[error(transparent)]
    Chat(#[from] ai_chat::ChatError),

    /// Audio merge failed
    #[error(transparent)]
    Merge(#[from] audio_pipeline::MergeError),

    /// Reading or writing an audio file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An audio file's extension maps to no supported format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Configuration is invalid
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
