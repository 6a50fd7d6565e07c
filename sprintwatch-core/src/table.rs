//! Raw tabular input as delivered by a source, before normalization.

use sprintwatch_types::RowRef;

/// A single cell value as read from the source.
///
/// Point-like columns may arrive either as text or as numbers depending on
/// the source format.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Wrap a text cell, mapping the empty string to `Empty`.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// A data row with its opaque back-reference.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row: RowRef,
    pub values: Vec<RawValue>,
}

static EMPTY: RawValue = RawValue::Empty;

impl RawRow {
    pub fn new(row: RowRef, values: Vec<RawValue>) -> Self {
        Self { row, values }
    }

    /// Cell at `index`; short rows read as empty.
    pub fn get(&self, index: usize) -> &RawValue {
        self.values.get(index).unwrap_or(&EMPTY)
    }
}

/// A header row plus data rows, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, assigning the next 1-based row reference.
    pub fn push_row(&mut self, values: Vec<RawValue>) -> RowRef {
        let row = RowRef::new(self.rows.len() as u32 + 1);
        self.rows.push(RawRow::new(row, values));
        row
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_read_as_empty() {
        let row = RawRow::new(RowRef::new(1), vec!["a".into()]);
        assert_eq!(row.get(0), &RawValue::Text("a".into()));
        assert!(row.get(5).is_empty());
    }

    #[test]
    fn push_row_numbers_from_one() {
        let mut table = RawTable::new(vec!["Sprint".into()]);
        assert_eq!(table.push_row(vec!["S1".into()]), RowRef::new(1));
        assert_eq!(table.push_row(vec!["S2".into()]), RowRef::new(2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_text_is_empty_value() {
        assert_eq!(RawValue::text(""), RawValue::Empty);
        assert_eq!(RawValue::from(3.0), RawValue::Number(3.0));
    }
}
