//! Tree walking over a [`RepoHost`].
//!
//! Two strategies:
//! - [`TreeWalker::flat_tree`]: one recursive listing per candidate branch,
//!   first success wins.
//! - [`TreeWalker::descend`]: FIFO queue of directory listings with the
//!   filter policy and content fetch fused into the walk.
//!
//! Requests are issued strictly one at a time.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::{
    EntryKind, FileRecord, PathEntry, RepositoryRef, Result, SkipReason, SkippedFile, TourError,
};
use crate::filter::{FilterDecision, FilterPolicy};
use crate::github::RepoHost;
use crate::obs;

pub const DEFAULT_BRANCHES: &[&str] = &["main", "master"];

/// Flat listing obtained from the first branch that answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTree {
    pub branch: String,
    pub entries: Vec<PathEntry>,
    pub truncated: bool,
}

impl FlatTree {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }
}

/// Counters for one recursive-descent walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    pub requests: u64,
    pub directories_listed: u64,
    pub directories_ignored: u64,
    pub files_included: u64,
    pub files_skipped: u64,
}

/// Everything a recursive-descent walk discovered, in queue order.
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    /// Every entry dequeued, including ignored directories.
    pub entries: Vec<PathEntry>,
    /// Accepted and decoded files.
    pub files: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
    pub stats: WalkStats,
}

impl WalkReport {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    fn skip(&mut self, path: String, reason: SkipReason) {
        obs::emit_file_skipped(&path, &reason);
        self.stats.files_skipped += 1;
        self.skipped.push(SkippedFile { path, reason });
    }
}

pub struct TreeWalker<'a> {
    host: &'a dyn RepoHost,
    policy: &'a FilterPolicy,
    branches: Vec<String>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(host: &'a dyn RepoHost, policy: &'a FilterPolicy) -> Self {
        TreeWalker {
            host,
            policy,
            branches: DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect(),
        }
    }

    /// Candidate branches for [`flat_tree`](Self::flat_tree), in priority order.
    pub fn with_branches(mut self, branches: Vec<String>) -> Self {
        self.branches = branches;
        self
    }

    pub async fn flat_tree(&self, repo: &RepositoryRef) -> Result<FlatTree> {
        for branch in &self.branches {
            match self.host.fetch_tree(repo, branch).await {
                Ok(tree) => {
                    if tree.truncated {
                        obs::emit_tree_truncated(repo, branch, tree.entries.len());
                    }
                    return Ok(FlatTree {
                        branch: branch.clone(),
                        entries: tree.entries,
                        truncated: tree.truncated,
                    });
                }
                Err(err) => obs::emit_branch_failed(repo, branch, &err),
            }
        }

        Err(TourError::TreeFetchFailed {
            repository: repo.to_string(),
            branches: self.branches.clone(),
        })
    }

    pub async fn descend(&self, repo: &RepositoryRef) -> Result<WalkReport> {
        let mut report = WalkReport::default();

        report.stats.requests += 1;
        report.stats.directories_listed += 1;
        let mut queue: VecDeque<PathEntry> = self.host.list_directory(repo, "").await?.into();

        while let Some(entry) = queue.pop_front() {
            report.entries.push(entry.clone());

            match entry.kind {
                EntryKind::Dir => {
                    if self.policy.is_ignored_dir(entry.name()) {
                        report.stats.directories_ignored += 1;
                        obs::emit_directory_ignored(&entry.path);
                        continue;
                    }
                    report.stats.requests += 1;
                    report.stats.directories_listed += 1;
                    queue.extend(self.host.list_directory(repo, &entry.path).await?);
                }
                EntryKind::File => {
                    if let FilterDecision::Reject(reason) = self.policy.evaluate(&entry) {
                        report.skip(entry.path, reason);
                        continue;
                    }

                    report.stats.requests += 1;
                    let bytes = self.host.fetch_file(repo, &entry.path).await?;
                    match String::from_utf8(bytes) {
                        Ok(content) => {
                            report.stats.files_included += 1;
                            report.files.push(FileRecord {
                                path: entry.path,
                                content,
                            });
                        }
                        Err(_) => report.skip(entry.path, SkipReason::NotUtf8),
                    }
                }
            }
        }

        Ok(report)
    }
}
