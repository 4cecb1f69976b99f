//! Structured observability hooks for the pipeline lifecycle.
//!
//! This module provides:
//! - A run-scoped tracing span carrying `run_id` and `repository`
//! - Emission functions for walk and run events
//!
//! Events are filtered through `REPOTOUR_LOG` (see [`crate::telemetry`]).

use tracing::{debug, info, warn};

use crate::domain::{KeyElements, RepositoryRef, SkipReason};

/// Run-scoped span tagged with the run id and repository.
///
/// Attach it to the run future with `tracing::Instrument` so every event
/// emitted during the run carries both fields.
///
/// # Example
///
/// ```ignore
/// run(repo).instrument(run_span("4b1f...", &repo)).await
/// ```
pub fn run_span(run_id: &str, repo: &RepositoryRef) -> tracing::Span {
    tracing::info_span!("repotour.run", run_id = %run_id, repository = %repo)
}

pub fn emit_run_started(run_id: &str, repo: &RepositoryRef, mode: &str) {
    info!(event = "run.started", run_id = %run_id, repository = %repo, mode = %mode);
}

pub fn emit_run_finished(run_id: &str, duration_ms: u64, files_included: u64, files_skipped: u64) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        files_included = files_included,
        files_skipped = files_skipped,
    );
}

/// A candidate branch did not answer; the next one is tried.
pub fn emit_branch_failed(repo: &RepositoryRef, branch: &str, error: &dyn std::fmt::Display) {
    warn!(event = "tree.branch_failed", repository = %repo, branch = %branch, error = %error);
}

pub fn emit_tree_truncated(repo: &RepositoryRef, branch: &str, entries: usize) {
    warn!(
        event = "tree.truncated",
        repository = %repo,
        branch = %branch,
        entries = entries,
        "tree listing truncated by host; continuing with partial listing"
    );
}

pub fn emit_directory_ignored(path: &str) {
    debug!(event = "walk.directory_ignored", path = %path);
}

/// Oversized files are surfaced at `warn`; other skips are routine.
pub fn emit_file_skipped(path: &str, reason: &SkipReason) {
    match reason {
        SkipReason::TooLarge { .. } => {
            warn!(event = "walk.file_skipped", path = %path, reason = %reason, "skipping file")
        }
        _ => debug!(event = "walk.file_skipped", path = %path, reason = %reason),
    }
}

pub fn emit_key_elements(key: &KeyElements) {
    info!(
        event = "classify.key_elements",
        key_files = ?key.key_files,
        key_directories = ?key.key_directories,
    );
}

pub fn emit_prompt_written(path: &std::path::Path, chars: usize) {
    info!(event = "context.written", path = %path.display(), chars = chars);
}

pub fn emit_llm_submitted(provider: &str, model: &str, prompt_chars: usize) {
    info!(
        event = "llm.submitted",
        provider = %provider,
        model = %model,
        prompt_chars = prompt_chars,
    );
}
