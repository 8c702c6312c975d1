//! Cancellation context for watch sessions.
//!
//! A [`WatchContext`] pairs a [`CancellationToken`] with an optional
//! deadline, so a caller can stop a session explicitly, let it expire, or
//! both. The reason is kept apart so the caller can tell them apart.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a [`WatchContext`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// [`WatchContext::cancel`] was called.
    Stopped,

    /// The deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => f.write_str("context canceled"),
            Self::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

/// Cooperative cancellation signal with an optional deadline.
#[derive(Debug, Clone, Default)]
pub struct WatchContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl WatchContext {
    /// Create a context that only ends on [`cancel`](Self::cancel).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context that also ends once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Create a context that also ends at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derive a context that is cancelled along with this one.
    ///
    /// The child inherits the parent's deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Narrow the deadline of this context; a later deadline is ignored.
    pub fn and_timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context has finished, or `None` while it is still live.
    ///
    /// An explicit stop wins over an expired deadline.
    pub fn reason(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            return Some(CancelReason::Stopped);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// Whether the context has finished for any reason.
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// Wait until the context finishes.
    pub async fn done(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => CancelReason::Stopped,
                    _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                CancelReason::Stopped
            }
        }
    }
}
