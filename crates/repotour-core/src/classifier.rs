//! Key-element classification by fixed naming heuristics.
//!
//! A single linear pass over every discovered path. Important files match by
//! path-segment suffix, so nested manifests qualify too. Important
//! directories match when some path starts with `"<dir>/"`; only the
//! directory name is recorded.

use crate::domain::KeyElements;
use crate::filter::FilterPolicy;

pub const DEFAULT_IMPORTANT_FILES: &[&str] = &[
    "README.md",
    "requirements.txt",
    "pyproject.toml",
    "setup.py",
    "Dockerfile",
];

pub const DEFAULT_IMPORTANT_DIRS: &[&str] =
    &["src", "app", "api", "backend", "frontend", "tests", "docs"];

#[derive(Debug, Clone)]
pub struct KeyElementClassifier {
    important_files: Vec<String>,
    important_dirs: Vec<String>,
    policy: FilterPolicy,
}

impl KeyElementClassifier {
    /// Build a classifier with the default tables. Important directories
    /// that the policy ignores are dropped: an ignored subtree is never
    /// part of the snapshot, so it cannot be key.
    pub fn new(policy: &FilterPolicy) -> Self {
        Self::with_tables(policy, DEFAULT_IMPORTANT_FILES, DEFAULT_IMPORTANT_DIRS)
    }

    pub fn with_tables<F, D>(policy: &FilterPolicy, files: &[F], dirs: &[D]) -> Self
    where
        F: AsRef<str>,
        D: AsRef<str>,
    {
        KeyElementClassifier {
            important_files: files.iter().map(|f| f.as_ref().to_string()).collect(),
            important_dirs: dirs
                .iter()
                .map(|d| d.as_ref().to_string())
                .filter(|d| !policy.is_ignored_dir(d))
                .collect(),
            policy: policy.clone(),
        }
    }

    pub fn important_dirs(&self) -> &[String] {
        &self.important_dirs
    }

    pub fn classify<I, S>(&self, paths: I) -> KeyElements
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = KeyElements::default();

        for path in paths {
            let path = path.as_ref();

            if !self.policy.is_ignored_path(path)
                && self.important_files.iter().any(|f| has_segment_suffix(path, f))
            {
                key.key_files.insert(path.to_string());
            }

            for dir in &self.important_dirs {
                if path
                    .strip_prefix(dir.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
                {
                    key.key_directories.insert(dir.clone());
                }
            }
        }

        key
    }
}

fn has_segment_suffix(path: &str, name: &str) -> bool {
    path == name
        || path
            .strip_suffix(name)
            .is_some_and(|head| head.ends_with('/'))
}
