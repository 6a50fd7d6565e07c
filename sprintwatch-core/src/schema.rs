//! Column schema, validated once before any row is read.

use std::fmt;

use crate::error::AnalysisError;
use crate::normalize::match_key;

/// The columns every input table must declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Team,
    Sprint,
    SprintStart,
    SprintEnd,
    ItemType,
    ItemId,
    CommittedPts,
    StoryPoints,
    State,
    Outcome,
}

impl Column {
    /// All required columns in declared order.
    pub const ALL: [Column; 10] = [
        Column::Team,
        Column::Sprint,
        Column::SprintStart,
        Column::SprintEnd,
        Column::ItemType,
        Column::ItemId,
        Column::CommittedPts,
        Column::StoryPoints,
        Column::State,
        Column::Outcome,
    ];

    /// The header text this column is declared under.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Team => "Team",
            Column::Sprint => "Sprint",
            Column::SprintStart => "Sprint Start",
            Column::SprintEnd => "Sprint End",
            Column::ItemType => "Item Type",
            Column::ItemId => "Item ID",
            Column::CommittedPts => "Story Points Committed",
            Column::StoryPoints => "Story Points",
            Column::State => "State",
            Column::Outcome => "Outcome",
        }
    }

    /// Whether the column holds point values.
    pub fn is_points(&self) -> bool {
        matches!(self, Column::CommittedPts | Column::StoryPoints)
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Resolved header positions for every required column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    indices: [usize; 10],
}

impl ColumnSchema {
    /// Locate every required column in a header row.
    ///
    /// Headers are compared trimmed (including non-breaking spaces) and
    /// case-insensitively. The first matching header wins. Fails with every
    /// missing column listed in declared order.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, AnalysisError> {
        let keys: Vec<String> = headers.iter().map(|h| match_key(h.as_ref())).collect();

        let mut indices = [0usize; 10];
        let mut missing = Vec::new();

        for column in Column::ALL {
            let wanted = match_key(column.header());
            match keys.iter().position(|k| *k == wanted) {
                Some(index) => indices[column.slot()] = index,
                None => missing.push(column.header().to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { indices })
        } else {
            Err(AnalysisError::MissingColumns(missing))
        }
    }

    /// Position of a column in the source row.
    pub fn index(&self, column: Column) -> usize {
        self.indices[column.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_headers() -> Vec<&'static str> {
        Column::ALL.iter().map(|c| c.header()).collect()
    }

    #[test]
    fn resolves_declared_order() {
        let schema = ColumnSchema::resolve(&full_headers()).unwrap();
        for (i, column) in Column::ALL.iter().enumerate() {
            assert_eq!(schema.index(*column), i);
        }
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        let mut headers: Vec<String> = full_headers().iter().map(|h| h.to_uppercase()).collect();
        headers.insert(0, "Notes".into());
        headers[2] = "\u{a0} sprint \u{a0}".into();

        let schema = ColumnSchema::resolve(&headers).unwrap();
        assert_eq!(schema.index(Column::Team), 1);
        assert_eq!(schema.index(Column::Sprint), 2);
        assert_eq!(schema.index(Column::Outcome), 10);
    }

    #[test]
    fn story_points_does_not_match_committed_header() {
        let headers = vec!["Team", "Sprint", "Story Points Committed"];
        let err = ColumnSchema::resolve(&headers).unwrap_err();
        let AnalysisError::MissingColumns(missing) = err else {
            panic!("expected missing columns");
        };
        assert!(missing.contains(&"Story Points".to_string()));
        assert!(!missing.contains(&"Story Points Committed".to_string()));
    }

    #[test]
    fn reports_all_missing_columns() {
        let headers = vec!["Team", "Sprint", "State"];
        let err = ColumnSchema::resolve(&headers).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingColumns(vec![
                "Sprint Start".into(),
                "Sprint End".into(),
                "Item Type".into(),
                "Item ID".into(),
                "Story Points Committed".into(),
                "Story Points".into(),
                "Outcome".into(),
            ])
        );
    }
}
