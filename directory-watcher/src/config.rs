//! Configuration types for directory watching.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatcherError};
use crate::snapshot::ScanOptions;

/// Default refresh interval in milliseconds.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1000;

/// Configuration for a watched directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Path to the directory.
    pub path: PathBuf,

    /// Time between two snapshots, in milliseconds.
    pub refresh_interval_ms: u64,

    /// Patterns to exclude (glob patterns matched against the full path).
    pub exclude_patterns: Vec<String>,

    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl WatchConfig {
    /// Create a new watch config with default settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            exclude_patterns: Vec::new(),
            max_depth: None,
            follow_symlinks: false,
        }
    }

    /// Parse a config from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Set the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enable following symbolic links.
    pub fn follow_symlinks(mut self) -> Self {
        self.follow_symlinks = true;
        self
    }

    /// The refresh interval as a [`Duration`].
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Check that the config can drive a watcher.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(WatcherError::InvalidInterval);
        }
        if self.path.as_os_str().is_empty() {
            return Err(WatcherError::Config("watch path is empty".to_string()));
        }
        self.scan_options().map(|_| ())
    }

    /// Compile the traversal settings.
    pub fn scan_options(&self) -> Result<ScanOptions> {
        let exclude = self
            .exclude_patterns
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| WatcherError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ScanOptions {
            exclude,
            max_depth: self.max_depth,
            follow_symlinks: self.follow_symlinks,
        })
    }
}
