//! Shared helpers for watch session tests.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use snapwatch_directory_watcher::{
    DirectoryWatcher, FileEvent, FileEventKind, Result, WatchContext,
};

pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Create an empty file with a unique name in `dir`.
pub fn mk_file(dir: &Path) -> PathBuf {
    let (_, path) = tempfile::Builder::new()
        .prefix("test-")
        .suffix(".txt")
        .tempfile_in(dir)
        .unwrap()
        .keep()
        .unwrap();
    path
}

/// Run one watch session on `root` for `timeout` while `mutate` changes the tree.
///
/// Returns the result of the watch call and every event a consumer received.
pub async fn run_session(
    root: &Path,
    timeout: Duration,
    mutate: impl Future<Output = ()>,
) -> (Result<()>, Vec<FileEvent>) {
    let watcher = DirectoryWatcher::new(TICK_INTERVAL).unwrap();
    run_session_with(watcher, root, timeout, mutate).await
}

/// Like [`run_session`], with a caller-built watcher.
pub async fn run_session_with(
    watcher: DirectoryWatcher,
    root: &Path,
    timeout: Duration,
    mutate: impl Future<Output = ()>,
) -> (Result<()>, Vec<FileEvent>) {
    let events = watcher.events();
    let ctx = WatchContext::with_timeout(timeout);

    let session = async move {
        let result = watcher.watch(&ctx, root).await;
        watcher.close();
        result
    };
    let collect = async {
        let mut seen = Vec::new();
        while let Some(event) = events.recv().await {
            seen.push(event);
        }
        seen
    };

    let (result, seen, ()) = tokio::join!(session, collect, mutate);
    (result, seen)
}

pub fn created(path: &Path) -> FileEvent {
    FileEvent::new(FileEventKind::Created, path)
}

pub fn removed(path: &Path) -> FileEvent {
    FileEvent::new(FileEventKind::Removed, path)
}
