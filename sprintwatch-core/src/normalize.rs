//! Record normalization: raw cells to typed, defaulted work items.
//!
//! Text is trimmed of surrounding whitespace and non-breaking spaces. Point
//! cells are coerced to non-negative finite numbers, falling back to `0.0`
//! for anything blank or unparseable. Normalization never fails on a row;
//! the only fatal condition is a header row missing required columns.

use sprintwatch_types::{sanitize_points, RowRef, WorkItemRecord};
use tracing::debug;

use crate::error::AnalysisError;
use crate::schema::{Column, ColumnSchema};
use crate::table::{RawRow, RawTable, RawValue};

/// A point cell whose stored form differs from its coerced value.
///
/// Sinks use these to optionally write the canonical numbers back.
#[derive(Debug, Clone, PartialEq)]
pub struct Coercion {
    pub row: RowRef,
    pub column: Column,
    /// The cell as it appeared in the source (empty for blank cells).
    pub original: String,
    pub value: f64,
}

/// Output of normalizing a table.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<WorkItemRecord>,
    pub coercions: Vec<Coercion>,
    /// Rows dropped because their sprint was blank.
    pub skipped_rows: Vec<RowRef>,
}

/// Trim whitespace and non-breaking spaces from a text value.
pub fn clean_text(s: &str) -> String {
    s.replace('\u{a0}', " ").trim().to_string()
}

/// Comparison key: trimmed, inner whitespace collapsed, lower-cased.
///
/// Used for every equality test on sprint ids, states, outcomes and headers.
/// Never stored as a canonical value.
pub fn match_key(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Render a cell as text. Integral numbers drop their fractional part.
pub fn cell_text(value: &RawValue) -> String {
    match value {
        RawValue::Empty => String::new(),
        RawValue::Text(s) => clean_text(s),
        RawValue::Number(n) => format_points(*n),
    }
}

/// Coerce a cell to points. Never fails.
pub fn coerce_points(value: &RawValue) -> f64 {
    match value {
        RawValue::Empty => 0.0,
        RawValue::Number(n) => sanitize_points(*n),
        RawValue::Text(s) => parse_points(s).unwrap_or(0.0),
    }
}

/// Parse a point value, ignoring whitespace and thousands separators.
pub fn parse_points(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().map(sanitize_points)
}

/// Canonical text form of a point value.
pub fn format_points(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Normalize every row of a table into work item records.
pub fn normalize(table: &RawTable) -> Result<Normalized, AnalysisError> {
    let schema = ColumnSchema::resolve(&table.headers)?;
    let mut out = Normalized::default();

    for raw in &table.rows {
        let sprint = cell_text(raw.get(schema.index(Column::Sprint)));
        if sprint.is_empty() {
            debug!(row = %raw.row, "skipping row with blank sprint");
            out.skipped_rows.push(raw.row);
            continue;
        }

        let committed_pts = points(raw, &schema, Column::CommittedPts, &mut out.coercions);
        let story_points = points(raw, &schema, Column::StoryPoints, &mut out.coercions);
        let text = |column: Column| cell_text(raw.get(schema.index(column)));

        out.records.push(WorkItemRecord {
            team: text(Column::Team),
            sprint,
            sprint_start: text(Column::SprintStart),
            sprint_end: text(Column::SprintEnd),
            item_type: text(Column::ItemType),
            item_id: text(Column::ItemId),
            committed_pts,
            story_points,
            state: text(Column::State),
            outcome: text(Column::Outcome),
            row: raw.row,
        });
    }

    debug!(
        records = out.records.len(),
        skipped = out.skipped_rows.len(),
        coerced = out.coercions.len(),
        "normalized table"
    );

    Ok(out)
}

fn points(
    raw: &RawRow,
    schema: &ColumnSchema,
    column: Column,
    coercions: &mut Vec<Coercion>,
) -> f64 {
    let cell = raw.get(schema.index(column));
    let value = coerce_points(cell);

    let original = match cell {
        RawValue::Number(n) if sanitize_points(*n) == *n => return value,
        RawValue::Number(n) => n.to_string(),
        RawValue::Text(s) => clean_text(s),
        RawValue::Empty => String::new(),
    };

    if original != format_points(value) {
        debug!(
            row = %raw.row,
            column = %column,
            original = %original,
            value,
            "coerced point cell"
        );
        coercions.push(Coercion {
            row: raw.row,
            column,
            original,
            value,
        });
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        Column::ALL.iter().map(|c| c.header().to_string()).collect()
    }

    /// Cells in header order, `|` separated.
    fn row(cells: &str) -> Vec<RawValue> {
        cells.split('|').map(RawValue::text).collect()
    }

    #[test]
    fn clean_text_strips_nbsp_and_whitespace() {
        assert_eq!(clean_text("\u{a0} Sprint 12 \u{a0}\t"), "Sprint 12");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn match_key_is_case_and_space_insensitive() {
        assert_eq!(match_key("  Sprint\u{a0}\u{a0}12 "), "sprint 12");
        assert_eq!(match_key("ACCEPTED"), match_key("accepted"));
        assert_ne!(match_key("accepted"), match_key("not accepted"));
    }

    #[test]
    fn parse_points_handles_separators() {
        assert_eq!(parse_points("1,250"), Some(1250.0));
        assert_eq!(parse_points(" 3.5 "), Some(3.5));
        assert_eq!(parse_points("\u{a0}8\u{a0}"), Some(8.0));
        assert_eq!(parse_points("abc"), None);
        assert_eq!(parse_points(""), None);
    }

    #[test]
    fn coerce_points_never_fails() {
        assert_eq!(coerce_points(&RawValue::Empty), 0.0);
        assert_eq!(coerce_points(&RawValue::Text("n/a".into())), 0.0);
        assert_eq!(coerce_points(&RawValue::Text("NaN".into())), 0.0);
        assert_eq!(coerce_points(&RawValue::Text("-4".into())), 0.0);
        assert_eq!(coerce_points(&RawValue::Number(f64::INFINITY)), 0.0);
        assert_eq!(coerce_points(&RawValue::Number(13.0)), 13.0);
    }

    #[test]
    fn format_points_drops_integral_fraction() {
        assert_eq!(format_points(5.0), "5");
        assert_eq!(format_points(2.5), "2.5");
        assert_eq!(format_points(0.0), "0");
    }

    #[test]
    fn normalizes_rows_and_skips_blank_sprints() {
        let mut table = RawTable::new(headers());
        table.push_row(row(" Core |S1|||Story|C-1|5|5|Accepted|Committed"));
        table.push_row(row("Core|\u{a0} |||Story|C-2|3|3|New|Committed"));
        table.push_row(row("Core|S1|||Bug|C-3||2|New|Added"));

        let out = normalize(&table).unwrap();

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.skipped_rows, vec![RowRef::new(2)]);

        let first = &out.records[0];
        assert_eq!(first.team, "Core");
        assert_eq!(first.sprint, "S1");
        assert_eq!(first.committed_pts, 5.0);
        assert_eq!(first.state, "Accepted");
        assert_eq!(first.row, RowRef::new(1));

        let third = &out.records[1];
        assert_eq!(third.committed_pts, 0.0);
        assert_eq!(third.story_points, 2.0);
        assert_eq!(third.row, RowRef::new(3));
    }

    #[test]
    fn numeric_cells_are_accepted_directly() {
        let mut table = RawTable::new(headers());
        let mut values = row("T|S1|||Story|X-1|||Accepted|Committed");
        values[6] = RawValue::Number(8.0);
        values[7] = RawValue::Number(8.0);
        table.push_row(values);

        let out = normalize(&table).unwrap();
        assert_eq!(out.records[0].committed_pts, 8.0);
        assert!(out.coercions.is_empty());
    }

    #[test]
    fn logs_coercions_for_non_canonical_points() {
        let mut table = RawTable::new(headers());
        table.push_row(row("T|S1|||Story|X-1|1,200|oops|Accepted|Committed"));
        table.push_row(row("T|S1|||Story|X-2|3||Accepted|Committed"));

        let out = normalize(&table).unwrap();

        assert_eq!(
            out.coercions,
            vec![
                Coercion {
                    row: RowRef::new(1),
                    column: Column::CommittedPts,
                    original: "1,200".into(),
                    value: 1200.0,
                },
                Coercion {
                    row: RowRef::new(1),
                    column: Column::StoryPoints,
                    original: "oops".into(),
                    value: 0.0,
                },
                Coercion {
                    row: RowRef::new(2),
                    column: Column::StoryPoints,
                    original: String::new(),
                    value: 0.0,
                },
            ]
        );
    }

    #[test]
    fn missing_columns_fail_before_rows() {
        let mut table = RawTable::new(vec!["Team".into(), "Sprint".into()]);
        table.push_row(vec!["T".into(), "S1".into()]);

        let err = normalize(&table).unwrap_err();
        let AnalysisError::MissingColumns(cols) = err else {
            panic!("expected missing columns");
        };
        assert_eq!(cols.len(), 8);
    }
}
