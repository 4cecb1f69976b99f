//! Filter policy: which files make it into the context.
//!
//! A file is accepted when its lowercased extension is allow-listed and its
//! size (when known) does not exceed the ceiling. Directory exclusion is a
//! separate exact-segment test that prunes whole subtrees before any of
//! their files are listed.

use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::{PathEntry, SkipReason};

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".java", ".c", ".cpp", ".md", ".txt", ".json", ".html", ".css",
];

pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "venv",
    "__pycache__",
    "dist",
    "build",
    "tests",
];

pub const DEFAULT_MAX_FILE_SIZE: u64 = 30_000;

/// Outcome of evaluating one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    Reject(SkipReason),
}

impl FilterDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, FilterDecision::Accept)
    }
}

/// Fixed allow-list, ignored-directory set and size ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    extensions: BTreeSet<String>,
    ignored_dirs: BTreeSet<String>,
    max_file_size: u64,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        FilterPolicy {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|d| d.to_string()).collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl FilterPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the extension allow-list. Entries are normalised to a
    /// lowercase, dot-prefixed form.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| {
                let e = e.as_ref().trim().to_lowercase();
                if e.starts_with('.') {
                    e
                } else {
                    format!(".{e}")
                }
            })
            .collect();
        self
    }

    pub fn with_ignored_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_dirs = dirs.into_iter().map(|d| d.as_ref().to_string()).collect();
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn ignored_dirs(&self) -> &BTreeSet<String> {
        &self.ignored_dirs
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Evaluate a file entry: extension first, then size.
    ///
    /// Directories are never accepted as files.
    pub fn evaluate(&self, entry: &PathEntry) -> FilterDecision {
        if entry.is_dir() || !self.extension_allowed(entry.name()) {
            return FilterDecision::Reject(SkipReason::UnsupportedExtension);
        }
        match entry.size {
            Some(size) if size > self.max_file_size => FilterDecision::Reject(SkipReason::TooLarge {
                size,
                limit: self.max_file_size,
            }),
            _ => FilterDecision::Accept,
        }
    }

    pub fn accept(&self, entry: &PathEntry) -> bool {
        self.evaluate(entry).is_accept()
    }

    /// Exact name match against the ignored-directory set.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.contains(name)
    }

    /// True when any directory segment of `path` (every segment but the
    /// last) is ignored.
    pub fn is_ignored_path(&self, path: &str) -> bool {
        let mut segments: Vec<&str> = path.split('/').collect();
        segments.pop();
        segments.iter().any(|s| self.is_ignored_dir(s))
    }

    fn extension_allowed(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&format!(".{}", e.to_lowercase())))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allow_listed_extension_within_limit() {
        let policy = FilterPolicy::default();
        assert!(policy.accept(&PathEntry::file("src/app.py", Some(1200))));
        assert!(policy.accept(&PathEntry::file("README.md", None)));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let policy = FilterPolicy::default();
        assert!(policy.accept(&PathEntry::file("NOTES.TXT", Some(10))));
        assert!(policy.accept(&PathEntry::file("Main.Java", Some(10))));
    }

    #[test]
    fn rejects_unknown_extension_regardless_of_size() {
        let policy = FilterPolicy::default();
        assert_eq!(
            policy.evaluate(&PathEntry::file("main.rs", Some(1))),
            FilterDecision::Reject(SkipReason::UnsupportedExtension)
        );
        assert!(!policy.accept(&PathEntry::file("Makefile", None)));
        assert!(!policy.accept(&PathEntry::file(".bashrc", None)));
    }

    #[test]
    fn rejects_oversized_file() {
        let policy = FilterPolicy::default();
        assert_eq!(
            policy.evaluate(&PathEntry::file("big.py", Some(35_000))),
            FilterDecision::Reject(SkipReason::TooLarge {
                size: 35_000,
                limit: 30_000
            })
        );
    }

    #[test]
    fn size_at_ceiling_is_accepted() {
        let policy = FilterPolicy::default();
        assert!(policy.accept(&PathEntry::file("edge.js", Some(30_000))));
    }

    #[test]
    fn directories_are_not_files() {
        let policy = FilterPolicy::default();
        assert!(!policy.accept(&PathEntry::dir("src.py")));
    }

    #[test]
    fn ignored_path_uses_exact_segments() {
        let policy = FilterPolicy::default();
        assert!(policy.is_ignored_path("tests/t.py"));
        assert!(policy.is_ignored_path("web/node_modules/x/index.js"));
        assert!(!policy.is_ignored_path("latest/x.py"));
        assert!(!policy.is_ignored_path("src/tests_util.py"));
        // the final segment is the entry itself, not a parent directory
        assert!(!policy.is_ignored_path("build"));
    }

    #[test]
    fn builders_normalise_extensions() {
        let policy = FilterPolicy::new()
            .with_extensions(["RS", ".toml"])
            .with_ignored_dirs(["target"])
            .with_max_file_size(10);
        assert!(policy.extensions().contains(".rs"));
        assert!(policy.extensions().contains(".toml"));
        assert!(policy.is_ignored_dir("target"));
        assert!(!policy.is_ignored_dir("tests"));
        assert!(!policy.accept(&PathEntry::file("lib.rs", Some(11))));
    }
}
