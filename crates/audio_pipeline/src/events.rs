//! Merge lifecycle events and cancellation
//!
//! Adapters report raw engine observations; [`ProgressReporter`] turns them
//! into a well-formed event stream so observers never see progress before
//! start, regressing percentages, or more than one terminal event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Notify};
use tracing::debug;

/// Lifecycle events emitted during a merge
#[derive(Debug, Clone, PartialEq)]
pub enum MergeEvent {
    /// The engine subprocess has started
    Started,
    /// Approximate completion percentage, non-decreasing in `0.0..=100.0`
    Progress(f32),
    /// The output file was produced
    Completed,
    /// The merge failed; carries the cause description
    Failed(String),
}

/// Orders and de-duplicates lifecycle events toward an optional channel
///
/// Events are delivered with `try_send`: a slow or absent observer never
/// stalls the merge, it just misses intermediate progress.
#[derive(Debug)]
pub(crate) struct ProgressReporter {
    tx: Option<mpsc::Sender<MergeEvent>>,
    started: bool,
    terminal: bool,
    last_percent: f32,
}

impl ProgressReporter {
    pub(crate) fn new(tx: Option<mpsc::Sender<MergeEvent>>) -> Self {
        Self {
            tx,
            started: false,
            terminal: false,
            last_percent: 0.0,
        }
    }

    fn emit(&self, event: MergeEvent) {
        if let Some(tx) = &self.tx {
            if tx.try_send(event).is_err() {
                debug!("Merge event dropped, observer not keeping up");
            }
        }
    }

    /// Emit `Started` exactly once
    pub(crate) fn started(&mut self) {
        if self.started || self.terminal {
            return;
        }
        self.started = true;
        self.emit(MergeEvent::Started);
    }

    /// Emit a progress update, clamped to `0.0..=100.0` and never regressing
    pub(crate) fn progress(&mut self, percent: f32) {
        if !self.started || self.terminal {
            return;
        }
        let percent = percent.clamp(0.0, 100.0);
        if percent < self.last_percent {
            return;
        }
        self.last_percent = percent;
        self.emit(MergeEvent::Progress(percent));
    }

    /// Emit the `Completed` terminal event
    pub(crate) fn completed(&mut self) {
        if self.terminal {
            return;
        }
        self.terminal = true;
        self.emit(MergeEvent::Completed);
    }

    /// Emit the `Failed` terminal event
    pub(crate) fn failed(&mut self, cause: &str) {
        if self.terminal {
            return;
        }
        self.terminal = true;
        self.emit(MergeEvent::Failed(cause.to_string()));
    }
}

/// Cooperative cancellation handle for an in-flight merge
///
/// Clones share one flag; cancelling any clone cancels the merge it was
/// passed to. Cancellation kills the engine subprocess and surfaces as
/// [`MergeError::Cancelled`](crate::MergeError::Cancelled).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Create a new, uncancelled token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once cancellation is requested
    pub(crate) async fn cancelled(&self) {
        loop {
            // Register before checking so a cancel between the check and
            // the await is not lost.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reporter_with_channel(capacity: usize) -> (ProgressReporter, mpsc::Receiver<MergeEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (ProgressReporter::new(Some(tx)), rx)
    }

    fn drain(rx: &mut mpsc::Receiver<MergeEvent>) -> Vec<MergeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn started_is_emitted_once() {
        let (mut reporter, mut rx) = reporter_with_channel(8);
        reporter.started();
        reporter.started();
        assert_eq!(drain(&mut rx), vec![MergeEvent::Started]);
    }

    #[tokio::test]
    async fn progress_before_start_is_dropped() {
        let (mut reporter, mut rx) = reporter_with_channel(8);
        reporter.progress(50.0);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn progress_never_regresses() {
        let (mut reporter, mut rx) = reporter_with_channel(8);
        reporter.started();
        reporter.progress(40.0);
        reporter.progress(30.0);
        reporter.progress(60.0);
        assert_eq!(
            drain(&mut rx),
            vec![
                MergeEvent::Started,
                MergeEvent::Progress(40.0),
                MergeEvent::Progress(60.0)
            ]
        );
    }

    #[tokio::test]
    async fn progress_is_clamped() {
        let (mut reporter, mut rx) = reporter_with_channel(8);
        reporter.started();
        reporter.progress(240.0);
        assert_eq!(
            drain(&mut rx),
            vec![MergeEvent::Started, MergeEvent::Progress(100.0)]
        );
    }

    #[tokio::test]
    async fn only_one_terminal_event() {
        let (mut reporter, mut rx) = reporter_with_channel(8);
        reporter.started();
        reporter.completed();
        reporter.failed("late failure");
        reporter.progress(90.0);
        assert_eq!(
            drain(&mut rx),
            vec![MergeEvent::Started, MergeEvent::Completed]
        );
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let (mut reporter, mut rx) = reporter_with_channel(1);
        reporter.started();
        reporter.progress(10.0);
        reporter.progress(20.0);
        assert_eq!(drain(&mut rx), vec![MergeEvent::Started]);
    }

    #[tokio::test]
    async fn no_channel_is_a_no_op() {
        let mut reporter = ProgressReporter::new(None);
        reporter.started();
        reporter.progress(50.0);
        reporter.completed();
    }

    #[tokio::test]
    async fn cancel_token_resolves_waiters() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        token.cancel();

        handle.await.unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_when_already_set() {
        let token = CancelToken::new();
        token.cancel();
        token.cancelled().await;
    }
}
