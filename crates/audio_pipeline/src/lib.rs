//! Audio merge pipeline
//!
//! Concatenates an ordered list of audio files into one loudness-normalized
//! output by driving FFmpeg through a filter graph:
//!
//! ```text
//! inputs ──▶ validate ──▶ [0:a][1:a]..concat ──▶ loudnorm ──▶ output
//!                              (filter graph, one ffmpeg process)
//! ```
//!
//! The pipeline owns no long-lived state: every call validates its inputs,
//! builds its own filter graph, and runs its own subprocess. Lifecycle events
//! (start, progress, one terminal event) can be observed through an optional
//! channel, and a [`CancelToken`] kills the subprocess mid-flight.
//!
//! # Example
//!
//! ```ignore
//! use audio_pipeline::{MergePipeline, MergeRequest};
//!
//! let pipeline = MergePipeline::with_defaults();
//! let request = MergeRequest::new(["intro.mp3", "body.mp3"], "episode.mp3");
//! pipeline.merge(request).await?;
//! ```

pub mod config;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod events;
pub mod graph;
pub mod pipeline;
pub mod request;

pub use config::MergeConfig;
pub use encoding::EncodingProfile;
pub use engine::FfmpegEngine;
pub use error::MergeError;
pub use events::{CancelToken, MergeEvent};
pub use graph::FilterGraph;
pub use pipeline::{MergeOptions, MergePipeline};
pub use request::MergeRequest;
