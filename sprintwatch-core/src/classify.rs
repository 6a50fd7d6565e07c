//! Health classification: sprint status and per-item contribution.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use sprintwatch_types::{
    ContributionReason, HealthReport, HealthStatus, ItemContribution, SprintHealth, SprintMetrics,
    WorkItemRecord,
};
use tracing::debug;

use crate::aggregate::{has_outcome, is_unfinished, ratio, OUTCOME_ADDED, OUTCOME_REMOVED};
use crate::normalize::match_key;

/// Default predictability threshold for a Good sprint.
pub const DEFAULT_THRESHOLD: f64 = 0.90;

/// Status for a sprint. The threshold is inclusive and not range-checked.
pub fn sprint_status(metrics: &SprintMetrics, threshold: f64) -> HealthStatus {
    if metrics.predictability >= threshold {
        HealthStatus::Good
    } else {
        HealthStatus::NotGood
    }
}

/// Why a record counts against its sprint, and the points it accounts for.
///
/// Rules are checked in order and the first match wins: added scope, then
/// removed scope, then committed work left unaccepted.
pub fn contribution(record: &WorkItemRecord) -> Option<(ContributionReason, f64)> {
    if has_outcome(record, OUTCOME_ADDED) {
        Some((ContributionReason::ScopeAdded, record.story_points))
    } else if has_outcome(record, OUTCOME_REMOVED) {
        Some((ContributionReason::ScopeRemoved, record.story_points))
    } else if is_unfinished(record) {
        Some((
            ContributionReason::CommittedNotAccepted,
            record.committed_pts,
        ))
    } else {
        None
    }
}

/// Classify every sprint and attribute contributing items.
///
/// Only records whose sprint appears in `metrics` are considered. Items are
/// reported in sprint order, then source order; each lands in exactly one of
/// the two item lists depending on its sprint's status.
///
/// Highlights are keyed by [`WorkItemRecord::row`], which should be unique.
/// If two records share a row the first one's highlight is kept.
pub fn classify(
    metrics: &[SprintMetrics],
    records: &[WorkItemRecord],
    threshold: f64,
) -> HealthReport {
    let statuses: Vec<HealthStatus> = metrics
        .iter()
        .map(|m| sprint_status(m, threshold))
        .collect();
    let slots: HashMap<String, usize> = metrics
        .iter()
        .enumerate()
        .map(|(i, m)| (match_key(&m.sprint), i))
        .collect();

    let mut items: Vec<Vec<ItemContribution>> = vec![Vec::new(); metrics.len()];
    let mut highlights = BTreeMap::new();

    for record in records {
        let Some(&slot) = slots.get(&match_key(&record.sprint)) else {
            continue;
        };
        let Some((reason, numerator)) = contribution(record) else {
            continue;
        };
        let sprint = &metrics[slot];

        if statuses[slot] == HealthStatus::NotGood {
            match highlights.entry(record.row) {
                Entry::Vacant(e) => {
                    e.insert(reason.highlight());
                }
                Entry::Occupied(e) => {
                    debug!(row = %record.row, kept = e.get().label(), "duplicate row reference");
                }
            }
        }

        items[slot].push(ItemContribution {
            sprint: sprint.sprint.clone(),
            item_id: record.item_id.clone(),
            outcome: record.outcome.clone(),
            state: record.state.clone(),
            committed_pts: record.committed_pts,
            story_points: record.story_points,
            reason,
            contribution_pct: ratio(numerator, sprint.committed_pts),
            row: record.row,
        });
    }

    let mut report = HealthReport {
        highlights,
        ..Default::default()
    };

    for ((m, status), sprint_items) in metrics.iter().zip(statuses).zip(items) {
        report.sprints.push(SprintHealth::from_metrics(m, status));
        match status {
            HealthStatus::Good => report.good_items.extend(sprint_items),
            HealthStatus::NotGood => report.not_good_items.extend(sprint_items),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintwatch_types::{Highlight, RowRef};

    fn item(
        row: u32,
        sprint: &str,
        committed: f64,
        points: f64,
        state: &str,
        outcome: &str,
    ) -> WorkItemRecord {
        WorkItemRecord::builder()
            .sprint(sprint)
            .item_id(format!("IT-{}", row))
            .committed_pts(committed)
            .story_points(points)
            .state(state)
            .outcome(outcome)
            .row(RowRef::new(row))
            .build()
    }

    fn rows(items: &[ItemContribution]) -> Vec<u32> {
        items.iter().map(|i| i.row.index()).collect()
    }

    fn metrics(sprint: &str, committed: f64, predictability: f64) -> SprintMetrics {
        SprintMetrics {
            committed_pts: committed,
            predictability,
            ..SprintMetrics::empty(sprint)
        }
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let at = metrics("S1", 10.0, 0.9);
        let below = metrics("S1", 10.0, 0.89);
        assert_eq!(sprint_status(&at, 0.9), HealthStatus::Good);
        assert_eq!(sprint_status(&below, 0.9), HealthStatus::NotGood);
    }

    #[test]
    fn out_of_range_thresholds_are_accepted() {
        let high = metrics("S1", 10.0, 1.2);
        let zero = metrics("S1", 0.0, 0.0);
        assert_eq!(sprint_status(&high, 1.5), HealthStatus::NotGood);
        assert_eq!(sprint_status(&zero, -1.0), HealthStatus::Good);
    }

    #[test]
    fn removed_takes_precedence_over_unfinished() {
        let removed = Some((ContributionReason::ScopeRemoved, 2.0));

        let r = item(1, "S1", 3.0, 2.0, "Accepted", "Removed");
        assert_eq!(contribution(&r), removed);

        let r = item(2, "S1", 3.0, 2.0, "New", "Removed");
        assert_eq!(contribution(&r), removed);
    }

    #[test]
    fn unfinished_uses_committed_points() {
        let r = item(1, "S1", 3.0, 8.0, "In Progress", "Committed");
        assert_eq!(
            contribution(&r),
            Some((ContributionReason::CommittedNotAccepted, 3.0))
        );
    }

    #[test]
    fn finished_committed_work_does_not_contribute() {
        let r = item(1, "S1", 3.0, 3.0, "Accepted", "Committed");
        assert_eq!(contribution(&r), None);
    }

    #[test]
    fn items_split_by_sprint_status() {
        let m = vec![metrics("S1", 10.0, 0.5), metrics("S2", 4.0, 1.0)];
        let records = vec![
            item(1, "S1", 0.0, 2.0, "New", "Added"),
            item(2, "S2", 0.0, 1.0, "New", "Added"),
            item(3, "S1", 5.0, 5.0, "New", "Committed"),
            item(4, "S1", 5.0, 5.0, "Accepted", "Committed"),
        ];

        let report = classify(&m, &records, 0.9);

        assert_eq!(rows(&report.not_good_items), [1, 3]);
        assert_eq!(rows(&report.good_items), [2]);

        assert_eq!(report.not_good_items[0].contribution_pct, 0.2);
        assert_eq!(report.not_good_items[1].contribution_pct, 0.5);
        assert_eq!(report.good_items[0].contribution_pct, 0.25);
    }

    #[test]
    fn highlights_only_in_not_good_sprints() {
        let m = vec![metrics("S1", 10.0, 0.5), metrics("S2", 4.0, 1.0)];
        let records = vec![
            item(1, "S1", 0.0, 2.0, "New", "Added"),
            item(2, "S1", 3.0, 2.0, "Accepted", "Removed"),
            item(3, "S1", 5.0, 5.0, "Blocked", "Committed"),
            item(4, "S2", 0.0, 1.0, "New", "Added"),
            item(5, "S1", 5.0, 5.0, "Accepted", "Committed"),
        ];

        let report = classify(&m, &records, 0.9);

        let expected: BTreeMap<RowRef, Highlight> = [
            (RowRef::new(1), Highlight::Added),
            (RowRef::new(2), Highlight::Removed),
            (RowRef::new(3), Highlight::Unfinished),
        ]
        .into_iter()
        .collect();
        assert_eq!(report.highlights, expected);
    }

    #[test]
    fn shared_row_keeps_first_highlight() {
        let m = vec![metrics("S1", 10.0, 0.0)];
        let records = vec![
            item(7, "S1", 4.0, 4.0, "New", "Committed"),
            item(7, "S1", 0.0, 2.0, "New", "Added"),
        ];

        let report = classify(&m, &records, 0.9);

        assert_eq!(report.not_good_items.len(), 2);
        assert_eq!(report.highlights.len(), 1);
        assert_eq!(report.highlights[&RowRef::new(7)], Highlight::Unfinished);
    }

    #[test]
    fn zero_commitment_gives_zero_contribution() {
        let m = vec![metrics("S1", 0.0, 0.0)];
        let records = vec![item(1, "S1", 0.0, 3.0, "New", "Added")];

        let report = classify(&m, &records, 0.9);
        assert_eq!(report.not_good_items[0].contribution_pct, 0.0);
    }

    #[test]
    fn records_outside_window_are_ignored() {
        let m = vec![metrics("S2", 5.0, 0.0)];
        let records = vec![item(1, "S1", 0.0, 3.0, "New", "Added")];

        let report = classify(&m, &records, 0.9);
        assert!(report.not_good_items.is_empty());
        assert!(report.highlights.is_empty());
        assert_eq!(report.sprints.len(), 1);
    }

    #[test]
    fn items_follow_sprint_order_then_source_order() {
        let m = vec![metrics("B", 10.0, 0.0), metrics("A", 10.0, 0.0)];
        let records = vec![
            item(1, "A", 0.0, 1.0, "New", "Added"),
            item(2, "B", 0.0, 1.0, "New", "Added"),
            item(3, "A", 0.0, 1.0, "New", "Removed"),
        ];

        let report = classify(&m, &records, 0.9);
        assert_eq!(rows(&report.not_good_items), [2, 1, 3]);
    }
}
