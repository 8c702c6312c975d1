//! Polling directory watcher implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::WatchConfig;
use crate::context::WatchContext;
use crate::error::{Result, SnapshotError, WatcherError};
use crate::event::FileEvent;
use crate::snapshot::{ScanOptions, Snapshot, SnapshotDiff};

/// Watches a directory tree by diffing periodic snapshots.
///
/// Events are handed over one at a time: the watch loop does not move on
/// until a consumer has received the event it is sending. A watcher with no
/// consumer stalls on its first change and only observes cancellation once
/// that event is taken.
#[derive(Debug)]
pub struct DirectoryWatcher {
    /// Time between two snapshots.
    refresh_interval: Duration,

    /// Traversal settings.
    options: ScanOptions,

    /// Event sender, dropped by [`close`](Self::close).
    event_tx: mpsc::Sender<FileEvent>,

    /// Event receiver (for consumers).
    event_rx: Arc<Mutex<mpsc::Receiver<FileEvent>>>,

    /// Set once a consumer refused further events.
    refused: CancellationToken,
}

impl DirectoryWatcher {
    /// Create a watcher that snapshots every `refresh_interval`.
    ///
    /// Does not touch the filesystem. A zero interval is rejected.
    pub fn new(refresh_interval: Duration) -> Result<Self> {
        Self::with_options(refresh_interval, ScanOptions::default())
    }

    /// Create a watcher with custom traversal settings.
    pub fn with_options(refresh_interval: Duration, options: ScanOptions) -> Result<Self> {
        if refresh_interval.is_zero() {
            return Err(WatcherError::InvalidInterval);
        }

        let (event_tx, event_rx) = mpsc::channel(1);

        Ok(Self {
            refresh_interval,
            options,
            event_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            refused: CancellationToken::new(),
        })
    }

    /// Create a watcher from a validated config.
    pub fn from_config(config: &WatchConfig) -> Result<Self> {
        config.validate()?;
        Self::with_options(config.refresh_interval(), config.scan_options()?)
    }

    /// Time between two snapshots.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Get a handle for receiving events.
    pub fn events(&self) -> EventReceiver {
        EventReceiver {
            inner: Arc::clone(&self.event_rx),
            refused: self.refused.clone(),
        }
    }

    /// Watch `root` until `ctx` finishes or a snapshot fails.
    ///
    /// Always returns an error: [`WatcherError::Cancelled`] when the context
    /// ended the session, anything else when the watcher failed.
    pub async fn watch(&self, ctx: &WatchContext, root: impl AsRef<Path>) -> Result<()> {
        let root = root.as_ref();

        // Other stat failures (e.g. permission denied) surface from the initial snapshot.
        match std::fs::metadata(root) {
            Ok(metadata) if !metadata.is_dir() => {
                return Err(WatcherError::NotADirectory(root.to_path_buf()));
            }
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                return Err(WatcherError::DirectoryNotFound(root.to_path_buf()));
            }
            _ => {}
        }

        let mut current = self.capture(root).await?;
        info!(
            "Watching {} ({} files, every {:?})",
            root.display(),
            current.len(),
            self.refresh_interval
        );

        let mut ticker = tokio::time::interval_at(
            Instant::now() + self.refresh_interval,
            self.refresh_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                reason = ctx.done() => {
                    info!("Stopped watching {}: {reason}", root.display());
                    return Err(WatcherError::Cancelled(reason));
                }
                _ = ticker.tick() => {
                    let next = match self.capture(root).await {
                        Ok(snapshot) => snapshot,
                        Err(e) => {
                            warn!("Snapshot of {} failed: {e}", root.display());
                            return Err(e);
                        }
                    };

                    let diff = current.diff(&next);
                    if !diff.is_empty() {
                        debug!(
                            "{}: {} created, {} removed",
                            root.display(),
                            diff.created.len(),
                            diff.removed.len()
                        );
                    }
                    self.emit(diff).await?;
                    current = next;
                }
            }
        }
    }

    /// Close the event channel.
    ///
    /// Consumers drain what is left and then see the end of the stream. Taking
    /// `self` means no watch session can still be running.
    pub fn close(self) {
        debug!("Closing directory watcher event channel");
        drop(self.event_tx);
    }

    async fn capture(&self, root: &Path) -> Result<Snapshot> {
        let root = root.to_path_buf();
        let options = self.options.clone();
        let snapshot = tokio::task::spawn_blocking(move || Snapshot::capture(&root, &options))
            .await
            .map_err(SnapshotError::from)??;
        Ok(snapshot)
    }

    async fn emit(&self, diff: SnapshotDiff) -> Result<()> {
        for event in diff.into_events() {
            trace!("Sending event: {event}");
            self.event_tx
                .send(event)
                .await
                .map_err(|_| WatcherError::ChannelClosed)?;

            // Capacity is one, so a permit only frees up once the event was received.
            let permit = self
                .event_tx
                .reserve()
                .await
                .map_err(|_| WatcherError::ChannelClosed)?;
            drop(permit);
        }
        Ok(())
    }
}

/// Receiving end of a watcher's events.
///
/// Clones share one queue; each event goes to whichever clone receives first.
#[derive(Debug, Clone)]
pub struct EventReceiver {
    inner: Arc<Mutex<mpsc::Receiver<FileEvent>>>,
    refused: CancellationToken,
}

impl EventReceiver {
    /// Receive the next event, or `None` once the watcher was closed and drained.
    ///
    /// After [`close`](Self::close) this returns `None` without waiting.
    pub async fn recv(&self) -> Option<FileEvent> {
        tokio::select! {
            biased;
            _ = self.refused.cancelled() => None,
            event = async { self.inner.lock().await.recv().await } => event,
        }
    }

    /// Refuse further events.
    ///
    /// A watch loop blocked on, or later reaching, an event send ends with
    /// [`WatcherError::ChannelClosed`] instead of waiting for a consumer.
    /// Clones parked in [`recv`](Self::recv) wake up with `None`.
    pub async fn close(&self) {
        // Releases the queue lock held by parked receivers.
        self.refused.cancel();
        self.inner.lock().await.close();
    }
}
