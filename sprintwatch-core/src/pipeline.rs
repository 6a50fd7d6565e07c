//! End-to-end analysis: normalize, select window, aggregate, summarize, classify.

use sprintwatch_types::{HealthReport, RowRef, SprintMetrics, WindowKpis, WorkItemRecord};
use tracing::info;

use crate::aggregate::aggregate;
use crate::classify::{classify, DEFAULT_THRESHOLD};
use crate::error::AnalysisError;
use crate::normalize::{normalize, Coercion};
use crate::summary::summarize;
use crate::table::RawTable;
use crate::window::{SprintWindow, WindowSpec};

/// Parameters for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Minimum per-sprint predictability for a Good sprint (inclusive).
    pub threshold: f64,
    pub window: WindowSpec,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            window: WindowSpec::default(),
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub threshold: f64,
    pub window: SprintWindow,
    /// Per-sprint metrics in window order.
    pub metrics: Vec<SprintMetrics>,
    pub kpis: WindowKpis,
    pub report: HealthReport,
    /// Number of normalized records the run saw.
    pub record_count: usize,
    /// Point cells coerced during normalization (table input only).
    pub coercions: Vec<Coercion>,
    /// Rows dropped for a blank sprint (table input only).
    pub skipped_rows: Vec<RowRef>,
}

/// Analyze a raw table.
///
/// Fails without partial output if required columns are missing, no row has
/// a sprint, or the window resolves to nothing.
pub fn analyze_table(
    table: &RawTable,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    let normalized = normalize(table)?;
    let mut analysis = analyze(&normalized.records, config)?;
    analysis.coercions = normalized.coercions;
    analysis.skipped_rows = normalized.skipped_rows;
    Ok(analysis)
}

/// Analyze already-normalized records.
pub fn analyze(
    records: &[WorkItemRecord],
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::NoRecords);
    }

    let window = config.window.resolve(records)?;
    let metrics = aggregate(records, &window);
    let kpis = summarize(&metrics);
    let report = classify(&metrics, records, config.threshold);

    info!(
        records = records.len(),
        sprints = window.len(),
        not_good = report.not_good_items.len(),
        good = report.good_items.len(),
        predictability = kpis.predictability,
        volatility = kpis.volatility,
        "analysis complete"
    );

    Ok(Analysis {
        threshold: config.threshold,
        window,
        metrics,
        kpis,
        report,
        record_count: records.len(),
        coercions: Vec::new(),
        skipped_rows: Vec::new(),
    })
}
