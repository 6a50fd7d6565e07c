//! Derived metric types: per-sprint counters and window-wide KPIs.

use alloc::string::String;
use alloc::vec::Vec;

/// Metrics for a single sprint in the analysis window.
///
/// Ratios are raw fractions (`0.85`, not `85`); formatting is up to the sink.
/// Every ratio with a zero denominator is exactly `0.0`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SprintMetrics {
    pub sprint: String,

    /// Committed points of items whose outcome is "committed".
    pub committed_pts: f64,
    /// Story points of items in the "accepted" state.
    pub accepted_pts: f64,
    /// Story points of items added mid-sprint.
    pub added_pts: f64,
    /// Story points of items removed mid-sprint.
    pub removed_pts: f64,

    /// `accepted_pts / committed_pts`.
    pub predictability: f64,
    /// `(added_pts + removed_pts) / committed_pts`.
    pub scope_change: f64,

    pub count_added: usize,
    pub count_removed: usize,
    /// Items with committed points that were not accepted.
    pub count_unfinished_committed: usize,
    pub pts_unfinished_committed: f64,
}

impl SprintMetrics {
    /// All-zero metrics for a sprint with no matching records.
    pub fn empty(sprint: impl Into<String>) -> Self {
        Self {
            sprint: sprint.into(),
            ..Default::default()
        }
    }

    /// Points affected by mid-sprint scope changes.
    pub fn scope_change_pts(&self) -> f64 {
        self.added_pts + self.removed_pts
    }
}

/// Display names for the window KPIs, in report order.
pub const KPI_AVG_ACCEPTED: &str = "Avg Accepted Pts";
pub const KPI_STD_DEV_ACCEPTED: &str = "StdDev Accepted Pts";
pub const KPI_PREDICTABILITY: &str = "Predictability";
pub const KPI_VOLATILITY: &str = "Volatility";
pub const KPI_AVG_COMMITTED: &str = "Avg Committed Pts";
pub const KPI_AVG_SCOPE_CHANGE: &str = "Avg Scope Change";
pub const KPI_VARIANCE_ACCEPTED: &str = "Variance Accepted Pts";

/// Statistics across every sprint in the window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowKpis {
    /// Mean accepted points per sprint.
    pub avg_accepted: f64,
    /// Sample standard deviation (n-1) of accepted points.
    pub std_dev_accepted: f64,
    /// `1 - std_dev / mean` of accepted points. Not clamped; can be negative.
    pub predictability: f64,
    /// Pooled scope change: sum of added+removed over sum of committed.
    pub volatility: f64,
    /// Mean committed points per sprint.
    pub avg_committed: f64,
    /// Mean of the per-sprint scope change ratios.
    pub avg_scope_change: f64,
    /// Sample variance (n-1) of accepted points.
    pub variance_accepted: f64,
}

impl WindowKpis {
    /// Flat `(name, value)` pairs in report order.
    pub fn pairs(&self) -> Vec<(&'static str, f64)> {
        alloc::vec![
            (KPI_AVG_ACCEPTED, self.avg_accepted),
            (KPI_STD_DEV_ACCEPTED, self.std_dev_accepted),
            (KPI_PREDICTABILITY, self.predictability),
            (KPI_VOLATILITY, self.volatility),
            (KPI_AVG_COMMITTED, self.avg_committed),
            (KPI_AVG_SCOPE_CHANGE, self.avg_scope_change),
            (KPI_VARIANCE_ACCEPTED, self.variance_accepted),
        ]
    }

    /// Whether a KPI is a ratio (rendered as a percentage) rather than points.
    pub fn is_ratio(name: &str) -> bool {
        matches!(
            name,
            KPI_PREDICTABILITY | KPI_VOLATILITY | KPI_AVG_SCOPE_CHANGE
        )
    }
}
