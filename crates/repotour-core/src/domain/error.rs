//! Error taxonomy for the repository-to-context pipeline.

use llm_gateway::LlmError;

/// Repo Tour errors.
///
/// Every variant is terminal for the run. Per-file skips are not errors;
/// they are reported as [`SkippedFile`](crate::domain::SkippedFile).
#[derive(Debug, thiserror::Error)]
pub enum TourError {
    #[error("{name} is not set; it is required for this run")]
    MissingSecret { name: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid repository '{input}': format must be owner/repo")]
    InvalidRepository { input: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{resource} fetch failed ({status})")]
    RemoteUnavailable { resource: String, status: u16 },

    #[error("repo tree fetch failed for {repository} (tried branches: {})", .branches.join(", "))]
    TreeFetchFailed {
        repository: String,
        branches: Vec<String>,
    },

    #[error("http error: {0}")]
    Http(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("llm error: {0}")]
    Llm(#[from] LlmError),
}

impl TourError {
    /// True for failures reported by, or while reaching, the code host.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            TourError::NotFound { .. }
                | TourError::RemoteUnavailable { .. }
                | TourError::TreeFetchFailed { .. }
                | TourError::Http(_)
        )
    }
}

impl From<reqwest::Error> for TourError {
    fn from(err: reqwest::Error) -> Self {
        TourError::Http(err.to_string())
    }
}

/// Result type for Repo Tour operations.
pub type Result<T> = std::result::Result<T, TourError>;
