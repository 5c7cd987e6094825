//! Vendor adapters for the speech ports
//!
//! Each adapter owns one HTTP client, makes one request per call, and
//! normalizes the vendor's wire format into the crate's common types.

pub mod deepgram;
pub mod elevenlabs;
pub mod openai;

pub use deepgram::DeepgramStt;
pub use elevenlabs::ElevenLabsTts;
pub use openai::OpenAiSpeech;
