//! Domain models for Repo Tour.
//!
//! Canonical definitions for the pipeline's entities:
//! - `RepositoryRef`: validated `owner/name` identifier
//! - `PathEntry`: one node of a repository tree
//! - `FileRecord` / `SkippedFile`: per-file outcome of a walk
//! - `KeyElements`: classified key files and directories

pub mod entry;
pub mod error;
pub mod key_elements;
pub mod repository;

pub use entry::{EntryKind, FileRecord, PathEntry, SkipReason, SkippedFile};
pub use error::{Result, TourError};
pub use key_elements::KeyElements;
pub use repository::RepositoryRef;
