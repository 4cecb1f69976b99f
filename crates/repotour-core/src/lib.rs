//! Repo Tour Core Library
//!
//! The repository-to-context pipeline: walk a hosted repository, filter its
//! files, classify key elements, assemble a bounded prompt and hand it to a
//! language model for a guided tour or an architecture review.

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod filter;
pub mod github;
pub mod obs;
pub mod pipeline;
pub mod prompt;
pub mod reporting;
pub mod telemetry;
pub mod walker;

pub use assembler::{assemble, PromptDocument, REVIEW_HEADER};
pub use classifier::KeyElementClassifier;
pub use config::Config;
pub use domain::{
    EntryKind, FileRecord, KeyElements, PathEntry, RepositoryRef, Result, SkipReason,
    SkippedFile, TourError,
};
pub use filter::{FilterDecision, FilterPolicy};
pub use github::{GitHubClient, GitHubConfig, RepoHost, RepoTree};
pub use pipeline::{Pipeline, ReviewContext, TourContext};
pub use reporting::{write_report_json, AnalysisMode, TourReport};
pub use telemetry::init_tracing;
pub use walker::{FlatTree, TreeWalker, WalkReport, WalkStats};

/// Repo Tour version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
