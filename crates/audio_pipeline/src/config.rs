//! Merge pipeline configuration

use serde::{Deserialize, Serialize};

/// Configuration for the merge pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Path to the ffmpeg executable (default: resolve `ffmpeg` via PATH)
    #[serde(default)]
    pub ffmpeg_path: Option<String>,

    /// Path to the ffprobe executable (default: resolve `ffprobe` via PATH)
    #[serde(default)]
    pub ffprobe_path: Option<String>,

    /// Apply loudness normalization and the high-quality MP3 profile.
    /// When false the pipeline only concatenates and lets the output
    /// container pick its encoding defaults.
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

const fn default_normalize() -> bool {
    true
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            normalize: default_normalize(),
        }
    }
}

impl MergeConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error message if a configured executable path is empty.
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.ffmpeg_path, Some(p) if p.trim().is_empty()) {
            return Err("ffmpeg_path must not be empty when set".to_string());
        }
        if matches!(&self.ffprobe_path, Some(p) if p.trim().is_empty()) {
            return Err("ffprobe_path must not be empty when set".to_string());
        }
        Ok(())
    }
}
