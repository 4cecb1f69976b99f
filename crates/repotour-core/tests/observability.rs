//! Observability tests for Repo Tour walks and runs.
//!
//! These tests verify that the structured events for skipped files,
//! truncated trees, failed branches and run lifecycle reach the subscriber.

use std::sync::Arc;

use repotour_core::fakes::{MemoryRepoHost, ScriptedModel};
use repotour_core::obs::{emit_llm_submitted, emit_run_finished, emit_run_started};
use repotour_core::{FilterPolicy, Pipeline, RepositoryRef, TreeWalker};
use tracing_test::traced_test;

fn repo() -> RepositoryRef {
    "octo/widgets".parse().expect("valid repository")
}

#[tokio::test]
#[traced_test]
async fn oversized_file_is_logged_and_walk_continues() {
    let host = MemoryRepoHost::new("main")
        .with_file("big.py", "#".repeat(35_000))
        .with_file("small.py", "ok");
    let policy = FilterPolicy::default();
    let report = TreeWalker::new(&host, &policy).descend(&repo()).await.unwrap();

    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].path, "small.py");
    assert!(logs_contain("walk.file_skipped"));
    assert!(logs_contain("big.py"));
    assert!(logs_contain("too large: 35000 bytes (limit 30000)"));
}

#[tokio::test]
#[traced_test]
async fn truncated_tree_is_used_with_a_warning() {
    let host = MemoryRepoHost::new("main")
        .with_file("README.md", "# hi")
        .with_file("src/app.py", "print()")
        .with_truncated_tree();
    let policy = FilterPolicy::default();
    let tree = TreeWalker::new(&host, &policy).flat_tree(&repo()).await.unwrap();

    assert!(tree.truncated);
    assert_eq!(tree.branch, "main");
    assert_eq!(
        tree.paths().collect::<Vec<_>>(),
        vec!["README.md", "src", "src/app.py"]
    );
    assert!(logs_contain("tree.truncated"));
    assert!(logs_contain("WARN"));
}

#[tokio::test]
#[traced_test]
async fn complete_tree_emits_no_truncation_warning() {
    let host = MemoryRepoHost::new("main").with_file("README.md", "# hi");
    let policy = FilterPolicy::default();
    let tree = TreeWalker::new(&host, &policy).flat_tree(&repo()).await.unwrap();

    assert!(!tree.truncated);
    assert!(!logs_contain("tree.truncated"));
}

#[tokio::test]
#[traced_test]
async fn failed_branch_candidate_is_logged() {
    let host = MemoryRepoHost::new("master").with_file("README.md", "# hi");
    let policy = FilterPolicy::default();
    TreeWalker::new(&host, &policy).flat_tree(&repo()).await.unwrap();

    assert!(logs_contain("tree.branch_failed"));
    assert!(logs_contain("tree main not found"));
}

#[tokio::test]
#[traced_test]
async fn review_run_logs_lifecycle_events() {
    let host = Arc::new(
        MemoryRepoHost::new("main")
            .with_file("README.md", "# Widgets")
            .with_file("node_modules/x.js", "x"),
    );
    let pipeline = Pipeline::new(host);
    let model = ScriptedModel::replying("fine");

    pipeline.architecture_review(&repo(), &model).await.unwrap();

    assert!(logs_contain("run.started"));
    assert!(logs_contain("walk.directory_ignored"));
    assert!(logs_contain("classify.key_elements"));
    assert!(logs_contain("llm.submitted"));
    assert!(logs_contain("run.finished"));
    assert!(logs_contain("octo/widgets"));
}

#[traced_test]
#[test]
fn test_emit_run_events_carry_run_id() {
    emit_run_started("run-123", &repo(), "guided_tour");
    emit_run_finished("run-123", 1500, 4, 1);
    emit_llm_submitted("gemini", "models/gemini-2.5-flash", 2048);

    assert!(logs_contain("run-123"));
    assert!(logs_contain("guided_tour"));
    assert!(logs_contain("prompt_chars=2048"));
}
