use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{KeyElements, SkippedFile};
use crate::walker::WalkStats;

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Which analysis a run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    GuidedTour,
    ArchitectureReview,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::GuidedTour => "guided_tour",
            AnalysisMode::ArchitectureReview => "architecture_review",
        }
    }

    /// Banner printed above the analysis.
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisMode::GuidedTour => "GUIDED DEVELOPER TOUR",
            AnalysisMode::ArchitectureReview => "ARCHITECTURE REVIEW",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one pipeline run, persisted on request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourReport {
    pub schema_version: String,
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub mode: AnalysisMode,
    pub provider: String,
    pub model: String,
    /// Branch that answered the tree listing (guided tour only).
    pub branch: Option<String>,
    pub key_elements: KeyElements,
    pub skipped_files: Vec<SkippedFile>,
    /// Walk counters (architecture review only).
    pub walk: Option<WalkStats>,
    pub prompt_chars: usize,
    pub prompt_sha256: String,
    pub analysis: String,
}

/// Write the report in pretty JSON format.
pub fn write_report_json(path: &Path, report: &TourReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize tour report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
