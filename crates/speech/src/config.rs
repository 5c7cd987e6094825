//! Configuration for speech providers
//!
//! One section per vendor; a vendor is registered only when its section is
//! present. Field defaults mirror each vendor's documented defaults.

use serde::{Deserialize, Serialize};

/// Top-level speech configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// OpenAI section (STT via Whisper, TTS)
    #[serde(default)]
    pub openai: Option<OpenAiSpeechConfig>,

    /// ElevenLabs section (TTS)
    #[serde(default)]
    pub elevenlabs: Option<ElevenLabsConfig>,

    /// Deepgram section (STT)
    #[serde(default)]
    pub deepgram: Option<DeepgramConfig>,
}

impl SpeechConfig {
    /// Validate every configured section
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(openai) = &self.openai {
            openai.validate()?;
        }
        if let Some(elevenlabs) = &self.elevenlabs {
            elevenlabs.validate()?;
        }
        if let Some(deepgram) = &self.deepgram {
            deepgram.validate()?;
        }
        Ok(())
    }
}

/// OpenAI speech settings (Whisper STT and TTS API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSpeechConfig {
    /// API key
    pub api_key: String,

    /// API base URL (for custom endpoints)
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Speech-to-text model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Text-to-speech model
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Default voice for TTS
    #[serde(default = "default_openai_voice")]
    pub default_voice: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl OpenAiSpeechConfig {
    /// Minimal config from an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_openai_base_url(),
            stt_model: default_stt_model(),
            tts_model: default_tts_model(),
            default_voice: default_openai_voice(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Validate the section
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("OpenAI API key must not be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("OpenAI timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// ElevenLabs TTS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    /// API key (sent as `xi-api-key`)
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_elevenlabs_base_url")]
    pub base_url: String,

    /// Synthesis model
    #[serde(default = "default_elevenlabs_model")]
    pub model_id: String,

    /// Default voice id
    #[serde(default = "default_elevenlabs_voice")]
    pub default_voice: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ElevenLabsConfig {
    /// Minimal config from an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_elevenlabs_base_url(),
            model_id: default_elevenlabs_model(),
            default_voice: default_elevenlabs_voice(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Validate the section
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("ElevenLabs API key must not be empty".to_string());
        }
        if self.default_voice.is_empty() {
            return Err("ElevenLabs default voice must not be empty".to_string());
        }
        Ok(())
    }
}

/// Deepgram STT settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepgramConfig {
    /// API key (sent as `Authorization: Token ...`)
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_deepgram_base_url")]
    pub base_url: String,

    /// Transcription model
    #[serde(default = "default_deepgram_model")]
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl DeepgramConfig {
    /// Minimal config from an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_deepgram_base_url(),
            model: default_deepgram_model(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Validate the section
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("Deepgram API key must not be empty".to_string());
        }
        Ok(())
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_openai_voice() -> String {
    "nova".to_string()
}

fn default_elevenlabs_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_elevenlabs_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_elevenlabs_voice() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

fn default_deepgram_base_url() -> String {
    "https://api.deepgram.com".to_string()
}

fn default_deepgram_model() -> String {
    "nova-2".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}
