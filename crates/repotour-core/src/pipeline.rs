//! End-to-end runs: repository → context → model → report.
//!
//! The pipeline owns the code-host session for the duration of a run; the
//! model is passed per call so that context-only runs never need one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use llm_gateway::LanguageModel;
use tracing::Instrument;
use uuid::Uuid;

use crate::assembler::{assemble, sha256_hex, PromptDocument, REVIEW_HEADER};
use crate::classifier::KeyElementClassifier;
use crate::domain::{KeyElements, RepositoryRef, Result, TourError};
use crate::filter::FilterPolicy;
use crate::github::RepoHost;
use crate::obs;
use crate::prompt::{build_tour_prompt, tree_sample};
use crate::reporting::{AnalysisMode, TourReport, REPORT_SCHEMA_VERSION};
use crate::walker::{FlatTree, TreeWalker, WalkReport, DEFAULT_BRANCHES};

/// Inputs gathered for a guided tour, before the model is called.
#[derive(Debug, Clone)]
pub struct TourContext {
    pub readme: String,
    pub tree: FlatTree,
    pub key_elements: KeyElements,
    pub prompt: String,
}

/// Inputs gathered for an architecture review, before the model is called.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    pub walk: WalkReport,
    pub key_elements: KeyElements,
    pub document: PromptDocument,
}

pub struct Pipeline {
    host: Arc<dyn RepoHost>,
    policy: FilterPolicy,
    classifier: KeyElementClassifier,
    branches: Vec<String>,
    prompt_artifact: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(host: Arc<dyn RepoHost>) -> Self {
        let policy = FilterPolicy::default();
        Pipeline {
            host,
            classifier: KeyElementClassifier::new(&policy),
            policy,
            branches: DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect(),
            prompt_artifact: None,
        }
    }

    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.classifier = KeyElementClassifier::new(&policy);
        self.policy = policy;
        self
    }

    pub fn with_branches(mut self, branches: Vec<String>) -> Self {
        self.branches = branches;
        self
    }

    /// Write the assembled review context to `path` on every review run.
    pub fn with_prompt_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_artifact = Some(path.into());
        self
    }

    pub fn prompt_artifact(&self) -> Option<&Path> {
        self.prompt_artifact.as_deref()
    }

    fn walker(&self) -> TreeWalker<'_> {
        TreeWalker::new(self.host.as_ref(), &self.policy).with_branches(self.branches.clone())
    }

    /// README, flat tree and key elements, folded into the tour prompt.
    pub async fn tour_context(&self, repo: &RepositoryRef) -> Result<TourContext> {
        tracing::info!("fetching README");
        let readme = self.host.fetch_readme(repo).await?;

        tracing::info!("fetching repository structure");
        let tree = self.walker().flat_tree(repo).await?;

        tracing::info!("identifying key components");
        let key_elements = self.classifier.classify(tree.paths());

        let sample = tree_sample(tree.paths(), &self.policy);
        let prompt = build_tour_prompt(&readme, &sample, &key_elements)?;

        Ok(TourContext {
            readme,
            tree,
            key_elements,
            prompt,
        })
    }

    /// Recursive-descent walk assembled into the review document.
    ///
    /// When a prompt artifact is configured the document is written there.
    pub async fn review_context(&self, repo: &RepositoryRef) -> Result<ReviewContext> {
        let walk = self.walker().descend(repo).await?;

        let key_elements = self.classifier.classify(walk.paths());
        obs::emit_key_elements(&key_elements);

        let document = assemble(REVIEW_HEADER, &walk.files);
        if let Some(path) = &self.prompt_artifact {
            document.write_to(path)?;
            obs::emit_prompt_written(path, document.char_len());
        }

        Ok(ReviewContext {
            walk,
            key_elements,
            document,
        })
    }

    pub async fn guided_tour(
        &self,
        repo: &RepositoryRef,
        model: &dyn LanguageModel,
    ) -> Result<TourReport> {
        let run = RunClock::start(repo, AnalysisMode::GuidedTour);
        let span = obs::run_span(&run.run_id.to_string(), repo);

        async {
            let context = self.tour_context(repo).await?;
            tracing::info!("generating guided tour");
            let analysis = submit(model, &context.prompt).await?;

            run.finish(0, 0);
            Ok::<TourReport, TourError>(TourReport {
                schema_version: REPORT_SCHEMA_VERSION.to_string(),
                run_id: run.run_id,
                generated_at: Utc::now(),
                repository: repo.to_string(),
                mode: AnalysisMode::GuidedTour,
                provider: model.provider().to_string(),
                model: model.model().to_string(),
                branch: Some(context.tree.branch),
                key_elements: context.key_elements,
                skipped_files: Vec::new(),
                walk: None,
                prompt_chars: context.prompt.chars().count(),
                prompt_sha256: sha256_hex(&context.prompt),
                analysis,
            })
        }
        .instrument(span)
        .await
    }

    pub async fn architecture_review(
        &self,
        repo: &RepositoryRef,
        model: &dyn LanguageModel,
    ) -> Result<TourReport> {
        let run = RunClock::start(repo, AnalysisMode::ArchitectureReview);
        let span = obs::run_span(&run.run_id.to_string(), repo);

        async {
            let context = self.review_context(repo).await?;
            tracing::info!("analyzing code");
            let analysis = submit(model, context.document.as_str()).await?;

            let stats = context.walk.stats;
            run.finish(stats.files_included, stats.files_skipped);
            Ok::<TourReport, TourError>(TourReport {
                schema_version: REPORT_SCHEMA_VERSION.to_string(),
                run_id: run.run_id,
                generated_at: Utc::now(),
                repository: repo.to_string(),
                mode: AnalysisMode::ArchitectureReview,
                provider: model.provider().to_string(),
                model: model.model().to_string(),
                branch: None,
                key_elements: context.key_elements,
                skipped_files: context.walk.skipped,
                walk: Some(stats),
                prompt_chars: context.document.char_len(),
                prompt_sha256: context.document.digest(),
                analysis,
            })
        }
        .instrument(span)
        .await
    }
}

async fn submit(model: &dyn LanguageModel, prompt: &str) -> Result<String> {
    obs::emit_llm_submitted(model.provider(), model.model(), prompt.chars().count());
    Ok(model.complete(prompt).await?)
}

/// Run id and timer for one analysis.
struct RunClock {
    run_id: Uuid,
    started: Instant,
}

impl RunClock {
    fn start(repo: &RepositoryRef, mode: AnalysisMode) -> Self {
        let run_id = Uuid::new_v4();
        obs::emit_run_started(&run_id.to_string(), repo, mode.as_str());
        RunClock {
            run_id,
            started: Instant::now(),
        }
    }

    fn finish(&self, files_included: u64, files_skipped: u64) {
        obs::emit_run_finished(
            &self.run_id.to_string(),
            self.started.elapsed().as_millis() as u64,
            files_included,
            files_skipped,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{MemoryRepoHost, ScriptedModel};

    fn repo() -> RepositoryRef {
        "octo/widgets".parse().unwrap()
    }

    #[tokio::test]
    async fn review_context_without_artifact_writes_nothing() {
        let host = Arc::new(MemoryRepoHost::new("main").with_file("app.py", "print(1)"));
        let pipeline = Pipeline::new(host);
        let context = pipeline.review_context(&repo()).await.unwrap();

        assert!(pipeline.prompt_artifact().is_none());
        assert_eq!(context.document.file_count(), 1);
        assert!(context.document.as_str().starts_with(REVIEW_HEADER));
    }

    #[tokio::test]
    async fn model_failure_aborts_the_run() {
        let host = Arc::new(MemoryRepoHost::new("main").with_file("README.md", "# w"));
        let pipeline = Pipeline::new(host);
        let model = ScriptedModel::failing(500);

        let err = pipeline.guided_tour(&repo(), &model).await.unwrap_err();
        assert!(matches!(err, TourError::Llm(_)));
    }
}
