//! Point-in-time file sets and the diff between two of them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use crate::error::SnapshotError;
use crate::event::{FileEvent, FileEventKind};

/// Traversal settings applied while capturing a snapshot.
///
/// The default walks the whole tree, excludes nothing and does not follow
/// symbolic links.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Paths matching any of these are skipped; matching directories are not entered.
    pub exclude: Vec<glob::Pattern>,

    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl ScanOptions {
    /// Whether `path` matches one of the exclude patterns.
    pub fn excludes(&self, path: &Path) -> bool {
        if self.exclude.is_empty() {
            return false;
        }
        let path = path.to_string_lossy();
        self.exclude.iter().any(|pattern| pattern.matches(&path))
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        self.excludes(entry.path())
    }
}

/// The set of file paths found under a root at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeSet<PathBuf>,
}

impl Snapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` and collect every entry that is not a directory.
    ///
    /// The first traversal error aborts the walk; a partial set is never returned.
    pub fn capture(root: &Path, options: &ScanOptions) -> Result<Self, SnapshotError> {
        let mut walker = WalkDir::new(root).follow_links(options.follow_symlinks);
        if let Some(depth) = options.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut files = BTreeSet::new();
        // The root itself is never excluded.
        for entry in walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !options.is_excluded(e))
        {
            let entry = entry.map_err(|source| SnapshotError::Traversal {
                root: root.to_path_buf(),
                source,
            })?;

            if !entry.file_type().is_dir() {
                files.insert(entry.into_path());
            }
        }

        trace!("Captured {} files under {}", files.len(), root.display());
        Ok(Self { files })
    }

    /// Number of files in the snapshot.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the snapshot holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether `path` was present.
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// Iterate over the paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Compare this (older) snapshot against `newer`.
    pub fn diff(&self, newer: &Snapshot) -> SnapshotDiff {
        SnapshotDiff {
            created: newer.files.difference(&self.files).cloned().collect(),
            removed: self.files.difference(&newer.files).cloned().collect(),
        }
    }
}

impl FromIterator<PathBuf> for Snapshot {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Paths that appeared and disappeared between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// In the newer snapshot only, sorted.
    pub created: Vec<PathBuf>,

    /// In the older snapshot only, sorted.
    pub removed: Vec<PathBuf>,
}

impl SnapshotDiff {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }

    /// Total number of events this diff produces.
    pub fn len(&self) -> usize {
        self.created.len() + self.removed.len()
    }

    /// Turn the diff into events, creations first.
    pub fn into_events(self) -> impl Iterator<Item = FileEvent> {
        let created = self
            .created
            .into_iter()
            .map(|path| FileEvent::new(FileEventKind::Created, path));
        let removed = self
            .removed
            .into_iter()
            .map(|path| FileEvent::new(FileEventKind::Removed, path));
        created.chain(removed)
    }
}
