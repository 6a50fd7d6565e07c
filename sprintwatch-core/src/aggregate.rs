//! Per-sprint aggregation.
//!
//! Records are grouped by sprint in a single pass; every counter for a
//! sprint is accumulated together and the ratios are derived at the end.

use std::collections::HashMap;

use sprintwatch_types::{SprintMetrics, WorkItemRecord};

use crate::normalize::match_key;
use crate::window::SprintWindow;

pub const OUTCOME_COMMITTED: &str = "committed";
pub const OUTCOME_ADDED: &str = "added";
pub const OUTCOME_REMOVED: &str = "removed";
pub const STATE_ACCEPTED: &str = "accepted";

/// Exact, case-insensitive outcome check.
pub fn has_outcome(record: &WorkItemRecord, outcome: &str) -> bool {
    match_key(&record.outcome) == outcome
}

pub fn is_accepted(record: &WorkItemRecord) -> bool {
    match_key(&record.state) == STATE_ACCEPTED
}

/// Committed work that was not accepted by sprint end.
pub fn is_unfinished(record: &WorkItemRecord) -> bool {
    record.committed_pts > 0.0 && !is_accepted(record)
}

/// `numerator / denominator`, or `0.0` when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Compute metrics for every sprint in the window, in window order.
///
/// Sprints without records get all-zero metrics.
pub fn aggregate(records: &[WorkItemRecord], window: &SprintWindow) -> Vec<SprintMetrics> {
    let mut metrics: Vec<SprintMetrics> =
        window.sprints().iter().map(SprintMetrics::empty).collect();
    let slots: HashMap<String, usize> = window
        .sprints()
        .iter()
        .enumerate()
        .map(|(i, s)| (match_key(s), i))
        .collect();

    for record in records {
        if let Some(&slot) = slots.get(&match_key(&record.sprint)) {
            accumulate(&mut metrics[slot], record);
        }
    }

    for m in &mut metrics {
        m.predictability = ratio(m.accepted_pts, m.committed_pts);
        m.scope_change = ratio(m.scope_change_pts(), m.committed_pts);
    }

    metrics
}

fn accumulate(m: &mut SprintMetrics, record: &WorkItemRecord) {
    let accepted = is_accepted(record);

    if has_outcome(record, OUTCOME_COMMITTED) {
        m.committed_pts += record.committed_pts;
    } else if has_outcome(record, OUTCOME_ADDED) {
        m.added_pts += record.story_points;
        m.count_added += 1;
    } else if has_outcome(record, OUTCOME_REMOVED) {
        m.removed_pts += record.story_points;
        m.count_removed += 1;
    }

    if accepted {
        m.accepted_pts += record.story_points;
    }

    if record.committed_pts > 0.0 && !accepted {
        m.count_unfinished_committed += 1;
        m.pts_unfinished_committed += record.committed_pts;
    }
}
