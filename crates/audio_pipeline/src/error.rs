//! Merge pipeline errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during an audio merge
#[derive(Debug, Error)]
pub enum MergeError {
    /// Request shape is invalid (empty input list, empty output path);
    /// raised before any I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An input file does not exist or is unreadable at validation time
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// FFmpeg reported an error or exited abnormally; carries the engine's
    /// own diagnostic text unmodified
    #[error("Engine failure: {0}")]
    EngineFailure(String),

    /// The FFmpeg executable could not be located or started
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The caller cancelled the merge
    #[error("Merge cancelled")]
    Cancelled,
}
