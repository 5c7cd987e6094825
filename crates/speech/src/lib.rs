//! Speech provider abstractions - uniform TTS and STT over cloud vendors
//!
//! Provides traits and implementations for speech processing:
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//! - `SpeechToText` - Transcribe audio to text (STT)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete vendor adapters
//! - `registry` dispatches to an adapter by provider id
//!
//! # Supported Providers
//!
//! - OpenAI (Whisper STT and TTS API) - id `openai`
//! - ElevenLabs (TTS) - id `elevenlabs`
//! - Deepgram (STT) - id `deepgram`
//!
//! # Example
//!
//! ```ignore
//! use speech::{SpeechRegistry, SpeechConfig, AudioData, AudioFormat};
//!
//! let registry = SpeechRegistry::from_config(&config)?;
//!
//! // Synthesize speech with whichever vendor the caller names
//! let audio = registry.tts("elevenlabs")?.synthesize("Hello!", None).await?;
//!
//! // Transcribe audio
//! let audio = AudioData::new(bytes, AudioFormat::Mp3);
//! let transcription = registry.stt("openai")?.transcribe(audio, None).await?;
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod registry;
pub mod types;

pub use config::{DeepgramConfig, ElevenLabsConfig, OpenAiSpeechConfig, SpeechConfig};
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use registry::SpeechRegistry;
pub use types::{AudioData, AudioFormat, Transcription};
