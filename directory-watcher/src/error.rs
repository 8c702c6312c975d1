//! Error types for the directory watcher.

use std::path::PathBuf;

use thiserror::Error;

use crate::context::CancelReason;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Errors that end a watch session or prevent one from starting.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Root directory does not exist.
    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Root path exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Refresh interval must be non-zero.
    #[error("refresh interval must be greater than zero")]
    InvalidInterval,

    /// Invalid exclude pattern.
    #[error("invalid exclude pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Initial or periodic snapshot failed.
    #[error("snapshot creation failed: {0}")]
    Snapshot(#[from] SnapshotError),

    /// The caller's context was cancelled or hit its deadline.
    #[error("{0}")]
    Cancelled(CancelReason),

    /// Every event receiver was dropped while an event was pending.
    #[error("event channel closed: no receiver left")]
    ChannelClosed,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatcherError {
    /// Whether the session ended because the caller asked it to.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// The cancellation reason, if this error is a cancellation.
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            Self::Cancelled(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Errors raised while capturing a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Walking the directory tree failed.
    #[error("error walking {}: {source}", root.display())]
    Traversal {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The blocking snapshot task panicked or was aborted.
    #[error("snapshot task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
