//! Command line arguments.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snapwatch_directory_watcher::WatchConfig;

#[derive(Debug, Parser)]
#[command(
    name = "snapwatch",
    version,
    about = "Report files created or removed under a directory by polling it"
)]
pub struct Cli {
    /// Directory to watch. Overrides the config file's `path`.
    pub path: Option<PathBuf>,

    /// TOML config file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Time between two snapshots, in milliseconds.
    #[arg(short, long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Stop after this many seconds.
    #[arg(short, long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Glob pattern of paths to ignore. Repeatable.
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Maximum depth to recurse into.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Follow symbolic links while walking.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// How events are printed on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log verbosity. Defaults to `SNAPWATCH_LOG`, then `info`.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `created <path>` / `removed <path>`
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Build the watch config: file first, then flags on top.
    pub fn watch_config(&self) -> Result<WatchConfig> {
        let mut config = match &self.config {
            Some(file) => WatchConfig::load(file)
                .with_context(|| format!("failed to load config {}", file.display()))?,
            None => WatchConfig::default(),
        };

        if let Some(path) = &self.path {
            config.path = path.clone();
        }
        if let Some(ms) = self.interval_ms {
            config = config.with_refresh_interval(Duration::from_millis(ms));
        }
        config.exclude_patterns.extend(self.exclude.iter().cloned());
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if self.follow_symlinks {
            config = config.follow_symlinks();
        }

        config.validate().context("invalid watch configuration")?;
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
