//! Error types for the analysis pipeline.

use thiserror::Error;

/// Unmet preconditions that abort a run.
///
/// Per-row data problems never surface here; they are recovered by
/// defaulting during normalization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The input table lacks one or more required columns.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// No row survived normalization.
    #[error("No work item records with a sprint were found")]
    NoRecords,

    /// No sprint id was resolved by any window path.
    #[error("No sprints resolved for the analysis window")]
    EmptyWindow,
}
