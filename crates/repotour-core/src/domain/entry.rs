//! Nodes of a repository tree and the per-file outcomes of a walk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a tree node is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Dir,
}

/// One node of a repository tree, addressed by its slash-separated path
/// from the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub path: String,
    pub kind: EntryKind,
    /// Size in bytes, when the listing reports it.
    pub size: Option<u64>,
}

impl PathEntry {
    pub fn file(path: impl Into<String>, size: Option<u64>) -> Self {
        PathEntry {
            path: path.into(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        PathEntry {
            path: path.into(),
            kind: EntryKind::Dir,
            size: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Decoded content of a file retained by the filter policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
}

/// Why a file was left out of the assembled context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    UnsupportedExtension,
    TooLarge { size: u64, limit: u64 },
    NotUtf8,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedExtension => f.write_str("unsupported extension"),
            SkipReason::TooLarge { size, limit } => {
                write!(f, "too large: {size} bytes (limit {limit})")
            }
            SkipReason::NotUtf8 => f.write_str("content is not valid UTF-8"),
        }
    }
}

/// A file seen by the walk but not included in the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}
