//! Top-level configuration
//!
//! One optional section per concern; leaving a section at its default
//! simply disables those providers without failing construction.

use audio_pipeline::MergeConfig;
use serde::{Deserialize, Serialize};

use ai_chat::ChatConfig;
use speech::SpeechConfig;

/// Configuration for the whole facade
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxkitConfig {
    /// Speech provider sections (TTS and STT)
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Chat provider sections
    #[serde(default)]
    pub chat: ChatConfig,

    /// Merge pipeline settings
    #[serde(default)]
    pub merge: MergeConfig,
}

impl VoxkitConfig {
    /// Validate every configured section
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid field.
    pub fn validate(&self) -> Result<(), String> {
        self.speech.validate()?;
        self.chat.validate()?;
        self.merge.validate()?;
        Ok(())
    }
}
