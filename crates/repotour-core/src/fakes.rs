//! In-memory fakes for the gateway traits (testing only)
//!
//! Provides `MemoryRepoHost` and `ScriptedModel`, which satisfy the
//! `RepoHost` and `LanguageModel` contracts without any network access and
//! record every call for assertions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use llm_gateway::{LanguageModel, LlmError};

use crate::domain::{PathEntry, RepositoryRef, Result, TourError};
use crate::github::{RepoHost, RepoTree};

// ---------------------------------------------------------------------------
// MemoryRepoHost
// ---------------------------------------------------------------------------

/// Repository served from a `BTreeMap<path, bytes>`.
///
/// Directories are implied by file paths. Listings are returned sorted by
/// path, as GitHub does. Only `branch` answers tree requests.
#[derive(Debug)]
pub struct MemoryRepoHost {
    branch: String,
    files: BTreeMap<String, Vec<u8>>,
    unavailable: BTreeSet<String>,
    truncated: bool,
    requests: Mutex<Vec<String>>,
}

impl MemoryRepoHost {
    pub fn new(branch: &str) -> Self {
        MemoryRepoHost {
            branch: branch.to_string(),
            files: BTreeMap::new(),
            unavailable: BTreeSet::new(),
            truncated: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), content.into());
        self
    }

    /// Make every request touching `path` answer 503.
    pub fn with_unavailable(mut self, path: &str) -> Self {
        self.unavailable.insert(path.to_string());
        self
    }

    /// Flag tree listings as truncated, as GitHub does past its size limit.
    pub fn with_truncated_tree(mut self) -> Self {
        self.truncated = true;
        self
    }

    /// Requests served so far, e.g. `"list src"`, `"file src/app.py"`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    fn check_available(&self, path: &str, resource: &str) -> Result<()> {
        if self.unavailable.contains(path) {
            return Err(TourError::RemoteUnavailable {
                resource: resource.to_string(),
                status: 503,
            });
        }
        Ok(())
    }

    fn directories(&self) -> BTreeSet<String> {
        let mut dirs = BTreeSet::new();
        for path in self.files.keys() {
            let mut prefix = String::new();
            let segments: Vec<&str> = path.split('/').collect();
            for segment in &segments[..segments.len() - 1] {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(segment);
                dirs.insert(prefix.clone());
            }
        }
        dirs
    }

    fn all_entries(&self) -> Vec<PathEntry> {
        let mut entries: Vec<PathEntry> = self
            .directories()
            .into_iter()
            .map(PathEntry::dir)
            .chain(
                self.files
                    .iter()
                    .map(|(path, bytes)| PathEntry::file(path.clone(), Some(bytes.len() as u64))),
            )
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

#[async_trait]
impl RepoHost for MemoryRepoHost {
    async fn fetch_tree(&self, _repo: &RepositoryRef, branch: &str) -> Result<RepoTree> {
        self.record(format!("tree {branch}"));
        if branch != self.branch {
            return Err(TourError::NotFound {
                resource: format!("tree {branch}"),
            });
        }
        Ok(RepoTree {
            entries: self.all_entries(),
            truncated: self.truncated,
        })
    }

    async fn list_directory(&self, _repo: &RepositoryRef, path: &str) -> Result<Vec<PathEntry>> {
        self.record(format!("list {}", if path.is_empty() { "/" } else { path }));
        self.check_available(path, &format!("directory {path}"))?;

        let entries = self.all_entries();
        if !path.is_empty() && !entries.iter().any(|e| e.is_dir() && e.path == path) {
            return Err(TourError::NotFound {
                resource: format!("directory {path}"),
            });
        }
        Ok(entries.into_iter().filter(|e| parent_of(&e.path) == path).collect())
    }

    async fn fetch_file(&self, _repo: &RepositoryRef, path: &str) -> Result<Vec<u8>> {
        self.record(format!("file {path}"));
        self.check_available(path, &format!("file {path}"))?;
        self.files.get(path).cloned().ok_or_else(|| TourError::NotFound {
            resource: format!("file {path}"),
        })
    }

    async fn fetch_readme(&self, _repo: &RepositoryRef) -> Result<String> {
        self.record("readme".to_string());
        let bytes = self.files.get("README.md").ok_or_else(|| TourError::NotFound {
            resource: "README".to_string(),
        })?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

// ---------------------------------------------------------------------------
// ScriptedModel
// ---------------------------------------------------------------------------

/// Language model that answers every prompt with a canned reply.
#[derive(Debug)]
pub struct ScriptedModel {
    reply: std::result::Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        ScriptedModel {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Model that fails every request with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        ScriptedModel {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn provider(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, prompt: &str) -> llm_gateway::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Status {
                provider: "scripted".to_string(),
                status: *status,
                body: "scripted failure".to_string(),
            }),
        }
    }
}
