//! Normalized work item records.

use alloc::string::String;
use core::fmt;

/// Opaque back-reference to the source row a record came from.
///
/// Assigned by the input side (for file sources it is the 1-based data row
/// index). The analysis never interprets it; it is carried through so that
/// sinks can highlight or rewrite the originating row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RowRef(pub u32);

impl RowRef {
    /// Create a row reference from a raw index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single work item, typed and defaulted.
///
/// Text fields are trimmed of whitespace and non-breaking spaces. Point
/// fields are always finite and non-negative; anything unparseable in the
/// source became `0.0`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkItemRecord {
    pub team: String,
    pub sprint: String,
    pub sprint_start: String,
    pub sprint_end: String,
    pub item_type: String,
    pub item_id: String,
    /// Points the team committed to at sprint start.
    pub committed_pts: f64,
    /// Current estimate of the item.
    pub story_points: f64,
    /// Workflow status, e.g. "Accepted".
    pub state: String,
    /// Scope lifecycle tag: "Committed", "Added" or "Removed".
    pub outcome: String,
    /// Source row. Should be unique across a run; highlights are keyed by it.
    pub row: RowRef,
}

impl WorkItemRecord {
    /// Create a builder for a work item record.
    pub fn builder() -> WorkItemRecordBuilder {
        WorkItemRecordBuilder::new()
    }
}

/// Builder for `WorkItemRecord`.
///
/// Point values passed in are sanitized the same way the normalizer does:
/// non-finite and negative values become `0.0`.
#[derive(Debug, Default)]
pub struct WorkItemRecordBuilder {
    record: WorkItemRecord,
}

impl WorkItemRecordBuilder {
    /// Create a new builder with every field empty.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.record.team = team.into();
        self
    }

    pub fn sprint(mut self, sprint: impl Into<String>) -> Self {
        self.record.sprint = sprint.into();
        self
    }

    /// Set the sprint start and end labels.
    pub fn dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.record.sprint_start = start.into();
        self.record.sprint_end = end.into();
        self
    }

    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.record.item_type = item_type.into();
        self
    }

    pub fn item_id(mut self, item_id: impl Into<String>) -> Self {
        self.record.item_id = item_id.into();
        self
    }

    pub fn committed_pts(mut self, pts: f64) -> Self {
        self.record.committed_pts = sanitize_points(pts);
        self
    }

    pub fn story_points(mut self, pts: f64) -> Self {
        self.record.story_points = sanitize_points(pts);
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.record.state = state.into();
        self
    }

    pub fn outcome(mut self, outcome: impl Into<String>) -> Self {
        self.record.outcome = outcome.into();
        self
    }

    /// Defaults to `RowRef(0)`; give each record its own row when the
    /// highlight map matters.
    pub fn row(mut self, row: RowRef) -> Self {
        self.record.row = row;
        self
    }

    /// Build the record.
    pub fn build(self) -> WorkItemRecord {
        self.record
    }
}

/// Clamp a point value to the record invariant (finite, non-negative).
pub fn sanitize_points(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_all_fields() {
        let r = WorkItemRecord::builder()
            .team("Platform")
            .sprint("S1")
            .dates("2024-01-01", "2024-01-14")
            .item_type("Story")
            .item_id("PLT-1")
            .committed_pts(3.0)
            .story_points(5.0)
            .state("Accepted")
            .outcome("Committed")
            .row(RowRef::new(4))
            .build();

        assert_eq!(r.team, "Platform");
        assert_eq!(r.sprint_start, "2024-01-01");
        assert_eq!(r.sprint_end, "2024-01-14");
        assert_eq!(r.item_type, "Story");
        assert_eq!(r.committed_pts, 3.0);
        assert_eq!(r.story_points, 5.0);
        assert_eq!(r.row.index(), 4);
    }

    #[test]
    fn builder_sanitizes_points() {
        let r = WorkItemRecord::builder()
            .committed_pts(f64::NAN)
            .story_points(-2.0)
            .build();

        assert_eq!(r.committed_pts, 0.0);
        assert_eq!(r.story_points, 0.0);
    }

    #[test]
    fn sanitize_keeps_positive_finite() {
        assert_eq!(sanitize_points(2.5), 2.5);
        assert_eq!(sanitize_points(f64::INFINITY), 0.0);
        assert_eq!(sanitize_points(-0.0), 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn row_ref_serializes_as_plain_number() {
        let json = serde_json::to_string(&RowRef::new(12)).unwrap();
        assert_eq!(json, "12");
    }
}
