//! Merge pipeline orchestration
//!
//! `MergePipeline` sequences one merge: shape checks, filesystem checks,
//! filter graph construction, then the engine run. Nothing is spawned and
//! no event is emitted until validation has passed.

use tokio::sync::mpsc;
use tracing::instrument;

use crate::config::MergeConfig;
use crate::encoding::EncodingProfile;
use crate::engine::FfmpegEngine;
use crate::error::MergeError;
use crate::events::{CancelToken, MergeEvent, ProgressReporter};
use crate::graph::FilterGraph;
use crate::request::MergeRequest;

/// Per-call observation and control hooks
#[derive(Debug, Default)]
pub struct MergeOptions {
    /// Channel receiving lifecycle events; `None` runs silently
    pub events: Option<mpsc::Sender<MergeEvent>>,
    /// Token to cancel the merge mid-flight
    pub cancel: Option<CancelToken>,
}

impl MergeOptions {
    /// Observe lifecycle events on the given channel
    #[must_use]
    pub fn with_events(mut self, events: mpsc::Sender<MergeEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Allow the merge to be cancelled through the given token
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Concatenates audio files into one encoded output via FFmpeg
#[derive(Debug, Clone)]
pub struct MergePipeline {
    config: MergeConfig,
    engine: FfmpegEngine,
}

impl MergePipeline {
    /// Create a pipeline from configuration
    ///
    /// # Errors
    ///
    /// Returns `MergeError::InvalidArgument` if the configuration is invalid.
    pub fn new(config: MergeConfig) -> Result<Self, MergeError> {
        config.validate().map_err(MergeError::InvalidArgument)?;
        let engine = FfmpegEngine::new(config.ffmpeg_path.as_deref(), config.ffprobe_path.as_deref());
        Ok(Self { config, engine })
    }

    /// Create a pipeline with default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        let config = MergeConfig::default();
        let engine = FfmpegEngine::new(None, None);
        Self { config, engine }
    }

    /// Whether the configured ffmpeg executable can be run
    pub async fn engine_available(&self) -> bool {
        self.engine.is_available().await
    }

    /// Merge the request's inputs into its output
    ///
    /// # Errors
    ///
    /// See [`merge_with`](Self::merge_with).
    pub async fn merge(&self, request: MergeRequest) -> Result<(), MergeError> {
        self.merge_with(request, MergeOptions::default()).await
    }

    /// Merge with lifecycle observation and cancellation
    ///
    /// # Errors
    ///
    /// - `MergeError::InvalidArgument` for an empty input list or output path
    /// - `MergeError::FileNotFound` when an input is missing or unreadable
    /// - `MergeError::EngineUnavailable` when ffmpeg cannot be started
    /// - `MergeError::EngineFailure` when ffmpeg reports an error
    /// - `MergeError::Cancelled` when the token fires first
    #[instrument(
        skip(self, request, options),
        fields(inputs = request.inputs().len(), output = %request.output().display())
    )]
    pub async fn merge_with(
        &self,
        request: MergeRequest,
        options: MergeOptions,
    ) -> Result<(), MergeError> {
        request.validate_shape()?;
        request.validate_inputs().await?;

        let graph = FilterGraph::build(request.inputs().len(), self.config.normalize);
        let profile = if self.config.normalize {
            EncodingProfile::HighQualityMp3
        } else {
            EncodingProfile::ContainerDefault
        };

        // Probing costs one ffprobe run per input; skip it when nobody is
        // watching progress.
        let total_us = if options.events.is_some() {
            self.engine.probe_total_duration_us(request.inputs()).await
        } else {
            None
        };

        let mut reporter = ProgressReporter::new(options.events);
        self.engine
            .run(
                &request,
                &graph,
                profile,
                total_us,
                &mut reporter,
                options.cancel.as_ref(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn empty_inputs_fail_before_any_io() {
        let pipeline = MergePipeline::with_defaults();
        let request = MergeRequest::new(Vec::<PathBuf>::new(), "/tmp/out.mp3");
        let err = pipeline.merge(request).await.unwrap_err();
        assert!(matches!(err, MergeError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn empty_output_fails_before_any_io() {
        let pipeline = MergePipeline::with_defaults();
        let request = MergeRequest::new(["a.mp3"], "");
        let err = pipeline.merge(request).await.unwrap_err();
        assert!(matches!(err, MergeError::InvalidArgument(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MergeConfig {
            ffmpeg_path: Some(String::new()),
            ..MergeConfig::default()
        };
        assert!(matches!(
            MergePipeline::new(config),
            Err(MergeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn options_builders_compose() {
        let (tx, _rx) = tokio::sync::mpsc::channel(4);
        let options = MergeOptions::default()
            .with_events(tx)
            .with_cancel(CancelToken::new());
        assert!(options.events.is_some());
        assert!(options.cancel.is_some());
    }
}
