//! Health classification results: sprint status, item blame and highlights.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{RowRef, SprintMetrics};

/// Health status for a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthStatus {
    Good,
    NotGood,
}

impl HealthStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Good => "OK",
            HealthStatus::NotGood => "LOW",
        }
    }

    /// Returns the report label.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Good => "Good",
            HealthStatus::NotGood => "NotGood",
        }
    }
}

/// Sprint health summary row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SprintHealth {
    pub sprint: String,
    pub status: HealthStatus,
    pub predictability: f64,
    pub scope_change: f64,
    pub committed_pts: f64,
    pub accepted_pts: f64,
    pub added_pts: f64,
    pub removed_pts: f64,
    pub count_added: usize,
    pub count_removed: usize,
    pub count_unfinished_committed: usize,
    pub pts_unfinished_committed: f64,
}

impl SprintHealth {
    /// Attach a status to a sprint's metrics.
    pub fn from_metrics(metrics: &SprintMetrics, status: HealthStatus) -> Self {
        Self {
            sprint: metrics.sprint.clone(),
            status,
            predictability: metrics.predictability,
            scope_change: metrics.scope_change,
            committed_pts: metrics.committed_pts,
            accepted_pts: metrics.accepted_pts,
            added_pts: metrics.added_pts,
            removed_pts: metrics.removed_pts,
            count_added: metrics.count_added,
            count_removed: metrics.count_removed,
            count_unfinished_committed: metrics.count_unfinished_committed,
            pts_unfinished_committed: metrics.pts_unfinished_committed,
        }
    }
}

/// Why an item counts against its sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContributionReason {
    ScopeAdded,
    ScopeRemoved,
    CommittedNotAccepted,
}

impl ContributionReason {
    /// Returns the report label.
    pub fn label(&self) -> &'static str {
        match self {
            ContributionReason::ScopeAdded => "Scope Added",
            ContributionReason::ScopeRemoved => "Scope Removed",
            ContributionReason::CommittedNotAccepted => "Committed Not Accepted",
        }
    }

    /// The highlight category matching this reason.
    pub fn highlight(&self) -> Highlight {
        match self {
            ContributionReason::ScopeAdded => Highlight::Added,
            ContributionReason::ScopeRemoved => Highlight::Removed,
            ContributionReason::CommittedNotAccepted => Highlight::Unfinished,
        }
    }
}

/// One item's share of its sprint's committed points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemContribution {
    pub sprint: String,
    pub item_id: String,
    pub outcome: String,
    pub state: String,
    pub committed_pts: f64,
    pub story_points: f64,
    pub reason: ContributionReason,
    /// Numerator of the reason divided by the sprint's committed points.
    pub contribution_pct: f64,
    pub row: RowRef,
}

/// Presentation category for a source row in an underperforming sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Highlight {
    Added,
    Removed,
    Unfinished,
}

impl Highlight {
    pub fn label(&self) -> &'static str {
        match self {
            Highlight::Added => "Added",
            Highlight::Removed => "Removed",
            Highlight::Unfinished => "Unfinished",
        }
    }
}

/// Complete classification output for one run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthReport {
    /// Sprint Health Summary, in window order.
    pub sprints: Vec<SprintHealth>,
    /// Contributing items whose sprint is NotGood.
    pub not_good_items: Vec<ItemContribution>,
    /// Contributing items whose sprint is Good.
    pub good_items: Vec<ItemContribution>,
    /// Row highlights for records in NotGood sprints.
    pub highlights: BTreeMap<RowRef, Highlight>,
}

impl HealthReport {
    /// Number of sprints with the given status.
    pub fn count(&self, status: HealthStatus) -> usize {
        self.sprints.iter().filter(|s| s.status == status).count()
    }

    /// Look up a sprint's health by id (exact match).
    pub fn sprint(&self, sprint: &str) -> Option<&SprintHealth> {
        self.sprints.iter().find(|s| s.sprint == sprint)
    }

    /// Contributing items of one sprint, from whichever report holds them.
    pub fn items_for<'a>(&'a self, sprint: &'a str) -> impl Iterator<Item = &'a ItemContribution> {
        self.not_good_items
            .iter()
            .chain(self.good_items.iter())
            .filter(move |i| i.sprint == sprint)
    }
}
