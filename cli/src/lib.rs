//! `snapwatch`: print the files created or removed under a directory.

pub mod cli;
pub mod logging;

use anyhow::{Context, Result};
use snapwatch_directory_watcher::{
    DirectoryWatcher, EventReceiver, FileEvent, WatchConfig, WatchContext,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;

pub use cli::{Cli, LogLevel, OutputFormat};

/// Run the watcher described by `cli` until Ctrl-C, timeout or failure.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.watch_config()?;
    let ctx = match cli.timeout() {
        Some(timeout) => WatchContext::with_timeout(timeout),
        None => WatchContext::new(),
    };

    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping");
            interrupt.cancel();
        }
    });

    watch_and_print(&config, &ctx, cli.format, &mut tokio::io::stdout()).await
}

/// Watch `config.path` and write one line per event to `out`.
///
/// Cancellation through `ctx` is a normal end and returns `Ok`.
pub async fn watch_and_print<W>(
    config: &WatchConfig,
    ctx: &WatchContext,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let watcher = DirectoryWatcher::from_config(config)?;
    let events = watcher.events();

    let session = async move {
        let result = watcher.watch(ctx, &config.path).await;
        watcher.close();
        result
    };
    let print = async {
        let printed = print_events(&events, format, out).await;
        if printed.is_err() {
            // Unblock the watch loop; it ends with a closed-channel error.
            events.close().await;
        }
        printed
    };

    let (watched, printed) = tokio::join!(session, print);
    printed?;
    match watched {
        Err(e) if e.is_cancelled() => {
            info!("Watch ended: {e}");
            Ok(())
        }
        other => other.with_context(|| format!("watching {} failed", config.path.display())),
    }
}

async fn print_events<W>(events: &EventReceiver, format: OutputFormat, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(event) = events.recv().await {
        let mut line = format_event(&event, format)?;
        line.push('\n');
        out.write_all(line.as_bytes()).await?;
        out.flush().await?;
    }
    Ok(())
}

/// Render one event as a line (without the newline).
pub fn format_event(event: &FileEvent, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(event.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string(event)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snapwatch_directory_watcher::FileEventKind;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_format_event() {
        let event = FileEvent::new(FileEventKind::Created, "/data/a.txt");
        assert_eq!(
            format_event(&event, OutputFormat::Text).unwrap(),
            "created /data/a.txt"
        );
        assert_eq!(
            format_event(&event, OutputFormat::Json).unwrap(),
            r#"{"kind":"file_created","path":"/data/a.txt"}"#
        );
    }

    #[tokio::test]
    async fn test_watch_and_print_until_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.csv");
        let config = WatchConfig::new(temp_dir.path()).with_refresh_interval(Duration::from_millis(50));
        let ctx = WatchContext::with_timeout(Duration::from_millis(400));
        let mut out = Vec::new();

        let create = async {
            tokio::time::sleep(Duration::from_millis(125)).await;
            std::fs::File::create(&path).unwrap();
        };
        let (printed, ()) = tokio::join!(
            watch_and_print(&config, &ctx, OutputFormat::Text, &mut out),
            create
        );

        printed.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("created {}\n", path.display())
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = WatchConfig::new(temp_dir.path().join("missing"));
        let mut out = Vec::new();

        let err = watch_and_print(&config, &WatchContext::new(), OutputFormat::Json, &mut out)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("directory does not exist"));
        assert!(out.is_empty());
    }
}
