//! File events produced by diffing snapshots.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A file appearing or disappearing under the watched root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEvent {
    /// The kind of event.
    pub kind: FileEventKind,

    /// Path to the affected file.
    pub path: PathBuf,
}

impl FileEvent {
    /// Create a new file event.
    pub fn new(kind: FileEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn is_created(&self) -> bool {
        self.kind == FileEventKind::Created
    }

    pub fn is_removed(&self) -> bool {
        self.kind == FileEventKind::Removed
    }
}

impl fmt::Display for FileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path.display())
    }
}

/// Kind of file event.
///
/// Renames show up as a `Removed` for the old path and a `Created` for the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileEventKind {
    /// File was created.
    #[serde(rename = "file_created")]
    Created,

    /// File was removed.
    #[serde(rename = "file_removed")]
    Removed,
}

impl fmt::Display for FileEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Removed => f.write_str("removed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_file_event_creation() {
        let event = FileEvent::new(FileEventKind::Created, "/test/file.txt");
        assert_eq!(event.kind, FileEventKind::Created);
        assert_eq!(event.path, Path::new("/test/file.txt"));
        assert!(event.is_created());
        assert!(!event.is_removed());
    }

    #[test]
    fn test_display() {
        let event = FileEvent::new(FileEventKind::Removed, "/test/file.txt");
        assert_eq!(event.to_string(), "removed /test/file.txt");
    }

    #[test]
    fn test_serialized_kind_names() {
        let event = FileEvent::new(FileEventKind::Created, "/test/a.txt");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "file_created", "path": "/test/a.txt" })
        );
    }
}
