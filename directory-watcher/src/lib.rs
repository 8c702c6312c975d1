//! # Directory Watcher
//!
//! Polling file system monitor. A [`DirectoryWatcher`] snapshots every file
//! under a root on a fixed interval and reports what appeared and what
//! disappeared since the previous snapshot.
//!
//! ## Features
//!
//! - **Recursive Snapshots**: every non-directory entry under the root
//! - **Create/Remove Events**: one event per path per change, creations first
//! - **Backpressure**: events are handed over one at a time, never dropped
//! - **Cancellation**: explicit stop or deadline via [`WatchContext`]
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Directory Watcher                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  WatchConfig ──► DirectoryWatcher ──► EventReceiver             │
//! │                    │        ▲              │                    │
//! │                    ▼        │              ▼                    │
//! │            Snapshot::diff  WatchContext   FileEvent             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A watch session ends with an error: [`WatcherError::Cancelled`] when the
//! caller stopped it, any other variant when the watcher failed. Close the
//! watcher once the session is over so consumers see the end of the stream.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod snapshot;
pub mod watcher;

pub use config::WatchConfig;
pub use context::{CancelReason, WatchContext};
pub use error::{Result, SnapshotError, WatcherError};
pub use event::{FileEvent, FileEventKind};
pub use snapshot::{ScanOptions, Snapshot, SnapshotDiff};
pub use watcher::{DirectoryWatcher, EventReceiver};
