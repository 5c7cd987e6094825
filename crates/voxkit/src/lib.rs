//! Uniform facade over speech, chat, and audio merge providers
//!
//! Every operation takes a provider id string and dispatches through a
//! registry, so call sites stay identical as vendors come and go:
//!
//! ```ignore
//! use voxkit::{Voxkit, VoxkitConfig};
//!
//! let config: VoxkitConfig = toml::from_str(&std::fs::read_to_string("voxkit.toml")?)?;
//! let vox = Voxkit::from_config(&config)?;
//!
//! vox.tts_to_file("elevenlabs", "Welcome back!", None, "intro.mp3").await?;
//! let transcript = vox.stt("deepgram", "meeting.wav").await?;
//! let summary = vox.llm("anthropic", &format!("Summarize: {}", transcript.text)).await?;
//! vox.merge(["intro.mp3", "body.mp3"], "episode.mp3").await?;
//! ```

pub mod config;
pub mod error;

use std::path::Path;

use tracing::instrument;

pub use ai_chat::{
    ChatConfig, ChatError, ChatMessage, ChatModel, ChatRegistry, ChatRequest, ChatResponse,
    ChatRole,
};
pub use audio_pipeline::{
    CancelToken, MergeConfig, MergeError, MergeEvent, MergeOptions, MergePipeline, MergeRequest,
};
pub use config::VoxkitConfig;
pub use error::VoxkitError;
pub use speech::{
    AudioData, AudioFormat, SpeechConfig, SpeechError, SpeechRegistry, SpeechToText, TextToSpeech,
    Transcription,
};

/// Entry point bundling the provider registries and the merge pipeline
#[derive(Debug)]
pub struct Voxkit {
    speech: SpeechRegistry,
    chat: ChatRegistry,
    pipeline: MergePipeline,
}

impl Voxkit {
    /// Build the facade from configuration
    ///
    /// Concerns without any configured provider get an empty registry;
    /// calling them later fails with a provider-not-found error rather
    /// than failing construction.
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::Configuration` if a configured section is
    /// invalid.
    pub fn from_config(config: &VoxkitConfig) -> Result<Self, VoxkitError> {
        config.validate().map_err(VoxkitError::Configuration)?;

        let has_speech = config.speech.openai.is_some()
            || config.speech.elevenlabs.is_some()
            || config.speech.deepgram.is_some();
        let speech = if has_speech {
            SpeechRegistry::from_config(&config.speech)?
        } else {
            SpeechRegistry::new()
        };

        let has_chat = config.chat.openai.is_some() || config.chat.anthropic.is_some();
        let chat = if has_chat {
            ChatRegistry::from_config(&config.chat)?
        } else {
            ChatRegistry::new()
        };

        let pipeline = MergePipeline::new(config.merge.clone())?;

        Ok(Self {
            speech,
            chat,
            pipeline,
        })
    }

    /// Assemble the facade from pre-built parts
    #[must_use]
    pub fn new(speech: SpeechRegistry, chat: ChatRegistry, pipeline: MergePipeline) -> Self {
        Self {
            speech,
            chat,
            pipeline,
        }
    }

    /// The speech provider registry
    #[must_use]
    pub fn speech(&self) -> &SpeechRegistry {
        &self.speech
    }

    /// The chat provider registry
    #[must_use]
    pub fn chat(&self) -> &ChatRegistry {
        &self.chat
    }

    /// The audio merge pipeline
    #[must_use]
    pub fn pipeline(&self) -> &MergePipeline {
        &self.pipeline
    }

    /// Synthesize speech from text
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::Speech` when the provider is unknown or the
    /// vendor request fails.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn tts(
        &self,
        provider: &str,
        text: &str,
        voice: Option<&str>,
    ) -> Result<AudioData, VoxkitError> {
        Ok(self.speech.tts(provider)?.synthesize(text, voice).await?)
    }

    /// Synthesize speech and write it to a file
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::Speech` on synthesis failure or
    /// `VoxkitError::Io` if the file cannot be written.
    #[instrument(skip(self, text, output), fields(text_len = text.len()))]
    pub async fn tts_to_file(
        &self,
        provider: &str,
        text: &str,
        voice: Option<&str>,
        output: impl AsRef<Path>,
    ) -> Result<(), VoxkitError> {
        let audio = self.tts(provider, text, voice).await?;
        tokio::fs::write(output.as_ref(), audio.data()).await?;
        Ok(())
    }

    /// Transcribe an audio file
    ///
    /// The audio format is derived from the file extension.
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::UnsupportedFormat` for an unknown extension,
    /// `VoxkitError::Io` if the file cannot be read, or
    /// `VoxkitError::Speech` on transcription failure.
    #[instrument(skip(self, audio_path))]
    pub async fn stt(
        &self,
        provider: &str,
        audio_path: impl AsRef<Path>,
    ) -> Result<Transcription, VoxkitError> {
        let path = audio_path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = AudioFormat::from_extension(extension)
            .ok_or_else(|| VoxkitError::UnsupportedFormat(extension.to_string()))?;

        let bytes = tokio::fs::read(path).await?;
        let audio = AudioData::new(bytes, format);
        Ok(self.speech.stt(provider)?.transcribe(audio, None).await?)
    }

    /// Transcribe in-memory audio
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::Speech` when the provider is unknown or the
    /// vendor request fails.
    pub async fn stt_audio(
        &self,
        provider: &str,
        audio: AudioData,
        language: Option<&str>,
    ) -> Result<Transcription, VoxkitError> {
        Ok(self.speech.stt(provider)?.transcribe(audio, language).await?)
    }

    /// Complete a single prompt and return the response text
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::Chat` when the provider is unknown or the
    /// vendor request fails.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn llm(&self, provider: &str, prompt: &str) -> Result<String, VoxkitError> {
        let response = self
            .chat
            .chat(provider)?
            .chat(ChatRequest::simple(prompt))
            .await?;
        Ok(response.content)
    }

    /// Run a multi-turn conversation
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::Chat` when the provider is unknown or the
    /// vendor request fails.
    #[instrument(skip(self, messages), fields(turns = messages.len()))]
    pub async fn llm_chat(
        &self,
        provider: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatResponse, VoxkitError> {
        let response = self
            .chat
            .chat(provider)?
            .chat(ChatRequest::from_messages(messages))
            .await?;
        Ok(response)
    }

    /// Merge audio files into one output
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::Merge` on validation or engine failure.
    pub async fn merge<I, P>(&self, inputs: I, output: impl Into<std::path::PathBuf>) -> Result<(), VoxkitError>
    where
        I: IntoIterator<Item = P>,
        P: Into<std::path::PathBuf>,
    {
        Ok(self.pipeline.merge(MergeRequest::new(inputs, output)).await?)
    }

    /// Merge with lifecycle observation and cancellation
    ///
    /// # Errors
    ///
    /// Returns `VoxkitError::Merge` on validation or engine failure, or
    /// when the merge is cancelled.
    pub async fn merge_with(
        &self,
        request: MergeRequest,
        options: MergeOptions,
    ) -> Result<(), VoxkitError> {
        Ok(self.pipeline.merge_with(request, options).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_facade() -> Voxkit {
        Voxkit::from_config(&VoxkitConfig::default()).unwrap()
    }

    #[test]
    fn empty_config_builds_a_facade() {
        let vox = empty_facade();
        assert!(vox.speech().tts_providers().is_empty());
        assert!(vox.chat().providers().is_empty());
    }

    #[test]
    fn invalid_section_fails_construction() {
        let config: VoxkitConfig = toml::from_str(
            r#"
            [chat.openai]
            api_key = ""
        "#,
        )
        .unwrap();
        assert!(matches!(
            Voxkit::from_config(&config),
            Err(VoxkitError::Configuration(_))
        ));
    }

    #[test]
    fn configured_providers_are_registered() {
        let config: VoxkitConfig = toml::from_str(
            r#"
            [speech.elevenlabs]
            api_key = "el-test"

            [chat.anthropic]
            api_key = "ak-test"
        "#,
        )
        .unwrap();
        let vox = Voxkit::from_config(&config).unwrap();

        assert_eq!(vox.speech().tts_providers(), vec!["elevenlabs"]);
        assert_eq!(vox.chat().providers(), vec!["anthropic"]);
    }

    #[tokio::test]
    async fn unknown_provider_surfaces_as_speech_error() {
        let err = empty_facade().tts("acme", "hello", None).await.unwrap_err();
        assert!(matches!(
            err,
            VoxkitError::Speech(SpeechError::ProviderNotFound(id)) if id == "acme"
        ));
    }

    #[tokio::test]
    async fn unknown_chat_provider_surfaces_as_chat_error() {
        let err = empty_facade().llm("acme", "hello").await.unwrap_err();
        assert!(matches!(
            err,
            VoxkitError::Chat(ChatError::ProviderNotFound(id)) if id == "acme"
        ));
    }

    #[tokio::test]
    async fn stt_rejects_unknown_extension_before_reading() {
        let err = empty_facade()
            .stt("openai", "/nonexistent/notes.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, VoxkitError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[tokio::test]
    async fn merge_validation_errors_pass_through() {
        let err = empty_facade()
            .merge(Vec::<std::path::PathBuf>::new(), "/tmp/out.mp3")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VoxkitError::Merge(MergeError::InvalidArgument(_))
        ));
    }
}
