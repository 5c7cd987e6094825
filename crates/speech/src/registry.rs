//! Provider registry - string-keyed dispatch to speech adapters
//!
//! Vendors are variants behind the `TextToSpeech`/`SpeechToText` ports;
//! callers pick one with a provider id string. Adding a vendor means
//! registering one more adapter, never touching call sites.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::providers::{DeepgramStt, ElevenLabsTts, OpenAiSpeech};

/// Lookup tables from provider id to adapter
#[derive(Default, Clone)]
pub struct SpeechRegistry {
    tts: HashMap<String, Arc<dyn TextToSpeech>>,
    stt: HashMap<String, Arc<dyn SpeechToText>>,
}

impl std::fmt::Debug for SpeechRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechRegistry")
            .field("tts", &self.tts.keys().collect::<Vec<_>>())
            .field("stt", &self.stt.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SpeechRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configuration
    ///
    /// Each configured vendor section is validated, constructed, and
    /// registered under its provider id. Sections left out are simply not
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if a configured section is
    /// invalid, or if no section is configured at all.
    pub fn from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let mut registry = Self::new();

        if let Some(openai) = &config.openai {
            let adapter = Arc::new(OpenAiSpeech::new(openai.clone())?);
            registry.register_tts(Arc::clone(&adapter) as Arc<dyn TextToSpeech>);
            registry.register_stt(adapter);
        }

        if let Some(elevenlabs) = &config.elevenlabs {
            registry.register_tts(Arc::new(ElevenLabsTts::new(elevenlabs.clone())?));
        }

        if let Some(deepgram) = &config.deepgram {
            registry.register_stt(Arc::new(DeepgramStt::new(deepgram.clone())?));
        }

        if registry.tts.is_empty() && registry.stt.is_empty() {
            return Err(SpeechError::Configuration(
                "At least one speech provider must be configured".to_string(),
            ));
        }

        info!(
            tts = ?registry.tts.keys().collect::<Vec<_>>(),
            stt = ?registry.stt.keys().collect::<Vec<_>>(),
            "Speech registry initialized"
        );

        Ok(registry)
    }

    /// Register a TTS adapter under its own provider id
    ///
    /// Re-registering an id replaces the previous adapter.
    pub fn register_tts(&mut self, adapter: Arc<dyn TextToSpeech>) {
        self.tts.insert(adapter.provider_id().to_string(), adapter);
    }

    /// Register an STT adapter under its own provider id
    pub fn register_stt(&mut self, adapter: Arc<dyn SpeechToText>) {
        self.stt.insert(adapter.provider_id().to_string(), adapter);
    }

    /// Resolve a TTS adapter by provider id
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::ProviderNotFound` for an unknown id.
    pub fn tts(&self, provider: &str) -> Result<Arc<dyn TextToSpeech>, SpeechError> {
        self.tts
            .get(provider)
            .cloned()
            .ok_or_else(|| SpeechError::ProviderNotFound(provider.to_string()))
    }

    /// Resolve an STT adapter by provider id
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::ProviderNotFound` for an unknown id.
    pub fn stt(&self, provider: &str) -> Result<Arc<dyn SpeechToText>, SpeechError> {
        self.stt
            .get(provider)
            .cloned()
            .ok_or_else(|| SpeechError::ProviderNotFound(provider.to_string()))
    }

    /// Registered TTS provider ids
    #[must_use]
    pub fn tts_providers(&self) -> Vec<&str> {
        self.tts.keys().map(String::as_str).collect()
    }

    /// Registered STT provider ids
    #[must_use]
    pub fn stt_providers(&self) -> Vec<&str> {
        self.stt.keys().map(String::as_str).collect()
    }
}
