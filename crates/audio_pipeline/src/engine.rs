//! FFmpeg subprocess driver
//!
//! One merge is one ffmpeg process. The engine pipes machine-readable
//! progress (`-progress pipe:1`) from stdout, keeps stderr for diagnostics,
//! and arms `kill_on_drop` so an abandoned merge never leaves an orphaned
//! encoder behind.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::encoding::EncodingProfile;
use crate::error::MergeError;
use crate::events::{CancelToken, ProgressReporter};
use crate::graph::FilterGraph;
use crate::request::MergeRequest;

/// Drives ffmpeg and ffprobe subprocesses
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegEngine {
    /// Create an engine with the given executable paths, falling back to
    /// PATH lookup when unset
    #[must_use]
    pub fn new(ffmpeg_path: Option<&str>, ffprobe_path: Option<&str>) -> Self {
        Self {
            ffmpeg: ffmpeg_path.unwrap_or("ffmpeg").to_string(),
            ffprobe: ffprobe_path.unwrap_or("ffprobe").to_string(),
        }
    }

    /// Check whether the ffmpeg executable can be run
    pub async fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Sum of input durations in microseconds, best effort
    ///
    /// Used only to scale progress; any probe failure degrades to `None`
    /// rather than failing the merge.
    pub(crate) async fn probe_total_duration_us(&self, inputs: &[PathBuf]) -> Option<u64> {
        let mut total_us = 0u64;
        for input in inputs {
            let output = Command::new(&self.ffprobe)
                .args([
                    "-v",
                    "error",
                    "-show_entries",
                    "format=duration",
                    "-of",
                    "default=noprint_wrappers=1:nokey=1",
                ])
                .arg(input)
                .stdin(Stdio::null())
                .output()
                .await
                .ok()?;

            if !output.status.success() {
                debug!(input = %input.display(), "ffprobe failed, progress will be unscaled");
                return None;
            }

            let seconds: f64 = String::from_utf8_lossy(&output.stdout).trim().parse().ok()?;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                total_us += (seconds * 1_000_000.0) as u64;
            }
        }
        Some(total_us)
    }

    fn build_args(
        request: &MergeRequest,
        graph: &FilterGraph,
        profile: EncodingProfile,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-nostats"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push("-progress".into());
        args.push("pipe:1".into());

        for input in request.inputs() {
            args.push("-i".into());
            args.push(input.clone().into());
        }

        args.push("-filter_complex".into());
        args.push(graph.spec().into());
        args.push("-map".into());
        args.push(FilterGraph::OUTPUT_LABEL.into());

        for arg in profile.args() {
            args.push((*arg).into());
        }

        args.push("-y".into());
        args.push(request.output().to_path_buf().into());
        args
    }

    /// Run the merge to completion, relaying lifecycle events
    #[instrument(
        skip(self, request, graph, reporter, cancel),
        fields(inputs = request.inputs().len(), output = %request.output().display())
    )]
    #[allow(clippy::too_many_lines, clippy::cast_precision_loss)]
    pub(crate) async fn run(
        &self,
        request: &MergeRequest,
        graph: &FilterGraph,
        profile: EncodingProfile,
        total_us: Option<u64>,
        reporter: &mut ProgressReporter,
        cancel: Option<&CancelToken>,
    ) -> Result<(), MergeError> {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(MergeError::Cancelled);
        }

        let args = Self::build_args(request, graph, profile);
        debug!(filter = graph.spec(), "Spawning ffmpeg");

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    let message = format!("ffmpeg not found at '{}'", self.ffmpeg);
                    reporter.failed(&message);
                    MergeError::EngineUnavailable(message)
                } else {
                    let message = format!("Failed to start ffmpeg: {e}");
                    reporter.failed(&message);
                    MergeError::EngineFailure(message)
                }
            })?;

        reporter.started();

        // Drain stderr from a separate task. ffmpeg blocks once the stderr
        // pipe buffer fills, and the progress loop below waits on stdout, so
        // deferring the stderr read until after stdout EOF can deadlock the
        // whole merge on error-heavy runs.
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf).await;
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                let line = if let Some(token) = cancel {
                    tokio::select! {
                        () = token.cancelled() => {
                            warn!("Merge cancelled, killing ffmpeg");
                            let _ = child.start_kill();
                            let _ = child.wait().await;
                            reporter.failed("cancelled by caller");
                            return Err(MergeError::Cancelled);
                        }
                        line = lines.next_line() => line,
                    }
                } else {
                    lines.next_line().await
                };

                match line {
                    Ok(Some(line)) => {
                        if let (Some(elapsed_us), Some(total_us)) =
                            (parse_progress_us(&line), total_us)
                        {
                            if total_us > 0 {
                                reporter
                                    .progress(elapsed_us as f32 / total_us as f32 * 100.0);
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        debug!(error = %e, "Progress pipe closed early");
                        break;
                    }
                }
            }
        }

        let status = if let Some(token) = cancel {
            tokio::select! {
                () = token.cancelled() => {
                    warn!("Merge cancelled, killing ffmpeg");
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    reporter.failed("cancelled by caller");
                    return Err(MergeError::Cancelled);
                }
                status = child.wait() => status,
            }
        } else {
            child.wait().await
        }
        .map_err(|e| MergeError::EngineFailure(format!("Failed to wait for ffmpeg: {e}")))?;

        let stderr_bytes = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => Vec::new(),
        };

        if status.success() {
            if tokio::fs::metadata(request.output()).await.is_err() {
                let message = "ffmpeg exited successfully but produced no output".to_string();
                reporter.failed(&message);
                return Err(MergeError::EngineFailure(message));
            }
            reporter.progress(100.0);
            reporter.completed();
            debug!("Merge completed");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&stderr_bytes).trim().to_string();
        let message = if stderr.is_empty() {
            format!("ffmpeg exited with {status}")
        } else {
            stderr
        };
        warn!(%status, "ffmpeg failed");
        reporter.failed(&message);
        Err(MergeError::EngineFailure(message))
    }
}

/// Parse an elapsed-time key from ffmpeg's `-progress` output
///
/// ffmpeg reports both `out_time_us` and `out_time_ms`, and both carry
/// microseconds.
fn parse_progress_us(line: &str) -> Option<u64> {
    let value = line
        .strip_prefix("out_time_us=")
        .or_else(|| line.strip_prefix("out_time_ms="))?;
    value.trim().parse().ok()
}
