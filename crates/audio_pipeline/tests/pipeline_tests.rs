//! Merge pipeline integration tests
//!
//! These tests exercise validation, event ordering, and engine failure paths
//! without requiring an ffmpeg installation.

use std::path::PathBuf;

use audio_pipeline::{
    CancelToken, MergeConfig, MergeError, MergeEvent, MergeOptions, MergePipeline, MergeRequest,
};
use tempfile::tempdir;
use tokio::sync::mpsc;

fn drain(rx: &mut mpsc::Receiver<MergeEvent>) -> Vec<MergeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Pipeline pointing at an executable that does not exist, so engine startup
/// fails deterministically.
fn unavailable_pipeline() -> MergePipeline {
    let config = MergeConfig {
        ffmpeg_path: Some("/nonexistent/ffmpeg-binary".to_string()),
        ffprobe_path: Some("/nonexistent/ffprobe-binary".to_string()),
        ..MergeConfig::default()
    };
    MergePipeline::new(config).unwrap()
}

async fn fixture_inputs(dir: &tempfile::TempDir) -> Vec<PathBuf> {
    let a = dir.path().join("a.mp3");
    let b = dir.path().join("b.mp3");
    tokio::fs::write(&a, b"not real audio").await.unwrap();
    tokio::fs::write(&b, b"not real audio").await.unwrap();
    vec![a, b]
}

#[tokio::test]
async fn missing_input_fails_without_touching_output() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.mp3");
    let output = dir.path().join("out.mp3");

    let (tx, mut rx) = mpsc::channel(16);
    let pipeline = unavailable_pipeline();
    let request = MergeRequest::new([missing.clone()], output.clone());
    let err = pipeline
        .merge_with(request, MergeOptions::default().with_events(tx))
        .await
        .unwrap_err();

    assert!(matches!(err, MergeError::FileNotFound(p) if p == missing));
    assert!(tokio::fs::metadata(&output).await.is_err());
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn empty_input_list_is_an_invalid_argument() {
    let pipeline = unavailable_pipeline();
    let request = MergeRequest::new(Vec::<PathBuf>::new(), "/tmp/out.mp3");
    let err = pipeline.merge(request).await.unwrap_err();
    assert!(matches!(err, MergeError::InvalidArgument(_)));
}

#[tokio::test]
async fn missing_engine_surfaces_as_unavailable() {
    let dir = tempdir().unwrap();
    let inputs = fixture_inputs(&dir).await;

    let pipeline = unavailable_pipeline();
    let request = MergeRequest::new(inputs, dir.path().join("out.mp3"));
    let err = pipeline.merge(request).await.unwrap_err();

    assert!(matches!(err, MergeError::EngineUnavailable(_)));
    assert!(err.to_string().contains("/nonexistent/ffmpeg-binary"));
}

#[tokio::test]
async fn failed_startup_emits_failure_without_start() {
    let dir = tempdir().unwrap();
    let inputs = fixture_inputs(&dir).await;

    let (tx, mut rx) = mpsc::channel(16);
    let pipeline = unavailable_pipeline();
    let request = MergeRequest::new(inputs, dir.path().join("out.mp3"));
    let result = pipeline
        .merge_with(request, MergeOptions::default().with_events(tx))
        .await;

    assert!(result.is_err());
    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], MergeEvent::Failed(_)));
}

#[tokio::test]
async fn pre_cancelled_token_stops_before_the_engine_runs() {
    let dir = tempdir().unwrap();
    let inputs = fixture_inputs(&dir).await;

    let token = CancelToken::new();
    token.cancel();

    let pipeline = unavailable_pipeline();
    let request = MergeRequest::new(inputs, dir.path().join("out.mp3"));
    let err = pipeline
        .merge_with(request, MergeOptions::default().with_cancel(token))
        .await
        .unwrap_err();

    assert!(matches!(err, MergeError::Cancelled));
}

#[tokio::test]
async fn engine_availability_reflects_configured_path() {
    let pipeline = unavailable_pipeline();
    assert!(!pipeline.engine_available().await);
}

/// Write a shell script standing in for ffmpeg and return its path.
#[cfg(unix)]
async fn fake_engine(dir: &tempfile::TempDir, script: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join("fake-ffmpeg.sh");
    tokio::fs::write(&path, script).await.unwrap();
    let mut perms = tokio::fs::metadata(&path).await.unwrap().permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(&path, perms).await.unwrap();
    path.to_str().unwrap().to_string()
}

#[cfg(unix)]
fn scripted_pipeline(ffmpeg: String) -> MergePipeline {
    let config = MergeConfig {
        ffmpeg_path: Some(ffmpeg),
        ffprobe_path: Some("/nonexistent/ffprobe-binary".to_string()),
        ..MergeConfig::default()
    };
    MergePipeline::new(config).unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn stderr_heavy_engine_does_not_stall_the_merge() {
    let dir = tempdir().unwrap();
    let inputs = fixture_inputs(&dir).await;
    let output = dir.path().join("out.mp3");

    // Floods stderr well past the pipe buffer before producing the output,
    // so a merge that defers the stderr read until stdout EOF deadlocks.
    let script = "#!/bin/sh\n\
        head -c 262144 /dev/zero | tr '\\0' 'e' >&2\n\
        for arg in \"$@\"; do out=\"$arg\"; done\n\
        printf 'merged' > \"$out\"\n\
        exit 0\n";
    let pipeline = scripted_pipeline(fake_engine(&dir, script).await);

    let (tx, mut rx) = mpsc::channel(16);
    let request = MergeRequest::new(inputs, output.clone());
    tokio::time::timeout(
        std::time::Duration::from_secs(10),
        pipeline.merge_with(request, MergeOptions::default().with_events(tx)),
    )
    .await
    .expect("merge must terminate while the engine floods stderr")
    .unwrap();

    assert_eq!(tokio::fs::read(&output).await.unwrap(), b"merged");
    assert_eq!(
        drain(&mut rx),
        vec![
            MergeEvent::Started,
            MergeEvent::Progress(100.0),
            MergeEvent::Completed
        ]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn cancel_after_progress_pipe_closes_still_kills_the_engine() {
    let dir = tempdir().unwrap();
    let inputs = fixture_inputs(&dir).await;

    // Closes both pipes immediately, then lingers: the merge is left waiting
    // on process exit with no stdout to read.
    let script = "#!/bin/sh\nexec 1>&- 2>&-\nsleep 30\n";
    let pipeline = scripted_pipeline(fake_engine(&dir, script).await);

    let token = CancelToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let request = MergeRequest::new(inputs, dir.path().join("out.mp3"));
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        pipeline.merge_with(request, MergeOptions::default().with_cancel(token)),
    )
    .await
    .expect("cancellation must interrupt the wait for engine exit");

    assert!(matches!(result, Err(MergeError::Cancelled)));
}

#[cfg(unix)]
#[tokio::test]
async fn engine_diagnostics_surface_verbatim() {
    let dir = tempdir().unwrap();
    let inputs = fixture_inputs(&dir).await;

    let script = "#!/bin/sh\n\
        echo 'Invalid data found when processing input' >&2\n\
        exit 1\n";
    let pipeline = scripted_pipeline(fake_engine(&dir, script).await);

    let request = MergeRequest::new(inputs, dir.path().join("out.mp3"));
    let err = pipeline.merge(request).await.unwrap_err();

    assert!(matches!(
        &err,
        MergeError::EngineFailure(msg) if msg == "Invalid data found when processing input"
    ));
}
