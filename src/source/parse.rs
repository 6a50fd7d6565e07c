//! Readers for the tabular export formats and curated sprint lists.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use sprintwatch_core::normalize::match_key;
use sprintwatch_core::{RawTable, RawValue};

use super::SourceError;

const BOM: char = '\u{feff}';

/// On-disk table format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    /// `.json` selects JSON; everything else is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TableFormat::Json,
            _ => TableFormat::Csv,
        }
    }
}

/// Read a whole table from disk.
pub fn read_table(path: &Path) -> Result<RawTable, SourceError> {
    let bytes = fs::read(path)?;
    match TableFormat::from_path(path) {
        TableFormat::Csv => parse_csv(bytes.as_slice()),
        TableFormat::Json => parse_json(&String::from_utf8_lossy(&bytes)),
    }
}

/// Parse CSV with a header row. Ragged rows are accepted; missing cells
/// read as empty.
pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .byte_headers()?
        .iter()
        .map(|h| lossy(h).trim_start_matches(BOM).to_string())
        .collect();
    let mut table = RawTable::new(headers);

    // Invalid UTF-8 decodes to U+FFFD instead of failing the read
    for result in rdr.byte_records() {
        let record = result?;
        let row = record.iter().map(|cell| RawValue::text(lossy(cell)));
        table.push_row(row.collect());
    }

    Ok(table)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse a JSON array of row objects.
///
/// Headers are the union of keys in first-seen order. Numbers stay numeric,
/// `null` reads as an empty cell and any other value is taken as text.
pub fn parse_json(content: &str) -> Result<RawTable, SourceError> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(SourceError::Format("expected a JSON array of rows".into()));
    };

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            let msg = format!("row {} is not an object", i + 1);
            return Err(SourceError::Format(msg));
        };
        for key in map.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
        objects.push(map);
    }

    let mut table = RawTable::new(headers.clone());
    for map in objects {
        let values = headers
            .iter()
            .map(|h| map.get(h).map_or(RawValue::Empty, json_cell))
            .collect();
        table.push_row(values);
    }

    Ok(table)
}

fn json_cell(value: &Value) -> RawValue {
    match value {
        Value::Null => RawValue::Empty,
        Value::Number(n) => n.as_f64().map_or(RawValue::Empty, RawValue::Number),
        Value::String(s) => RawValue::text(s.as_str()),
        other => RawValue::text(other.to_string()),
    }
}

/// Load a curated sprint list from disk.
pub fn load_sprint_list(path: &Path) -> Result<Vec<String>, SourceError> {
    Ok(parse_sprint_list(&fs::read_to_string(path)?))
}

/// One sprint id per line. Blank lines and `#` comments are ignored, as is
/// a leading `Sprint` header line.
pub fn parse_sprint_list(content: &str) -> Vec<String> {
    let trim = |c: char| c.is_whitespace() || c == BOM;
    let mut ids: Vec<String> = content
        .lines()
        .map(|line| line.trim_matches(trim))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if ids.first().is_some_and(|h| match_key(h) == "sprint") {
        ids.remove(0);
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintwatch_types::RowRef;

    #[test]
    fn test_format_from_extension() {
        let format = |p: &str| TableFormat::from_path(Path::new(p));
        assert_eq!(format("a.json"), TableFormat::Json);
        assert_eq!(format("a.JSON"), TableFormat::Json);
        assert_eq!(format("a.csv"), TableFormat::Csv);
        assert_eq!(format("export"), TableFormat::Csv);
    }

    #[test]
    fn test_parse_csv_ragged_rows() {
        let data = "\u{feff}Team,Sprint,Story Points\nCore,S1,3\nCore,S2\n";
        let table = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(table.headers, ["Team", "Sprint", "Story Points"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].row, RowRef::new(1));
        assert_eq!(table.rows[0].get(2), &RawValue::Text("3".into()));
        assert_eq!(table.rows[1].get(2), &RawValue::Empty);
    }

    #[test]
    fn test_parse_csv_invalid_utf8_cell() {
        let mut data = b"Sprint,Item ID,Story Points\nS1,A-1,3\nS1,Caf".to_vec();
        data.push(0xE9);
        data.extend_from_slice(b",2\n");

        let table = parse_csv(data.as_slice()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get(1), &RawValue::Text("A-1".into()));
        assert_eq!(table.rows[1].get(1), &RawValue::Text("Caf\u{fffd}".into()));
        assert_eq!(table.rows[1].get(2), &RawValue::Text("2".into()));
    }

    #[test]
    fn test_parse_json_headers_in_first_seen_order() {
        let data = r#"[
            {"Team": "Core", "Sprint": "S1"},
            {"Outcome": "Added", "Sprint": "S2"}
        ]"#;
        let table = parse_json(data).unwrap();
        assert_eq!(table.headers, ["Team", "Sprint", "Outcome"]);
    }

    #[test]
    fn test_parse_json_rows() {
        let data = r#"[
            {"Sprint": "S1", "Story Points": 5, "State": null},
            {"Sprint": "S2", "Outcome": "Added"}
        ]"#;
        let table = parse_json(data).unwrap();

        assert_eq!(table.len(), 2);
        let col = |name: &str| table.headers.iter().position(|h| h == name).unwrap();
        let sprint = col("Sprint");
        let points = col("Story Points");
        let state = col("State");
        let outcome = col("Outcome");

        assert_eq!(table.rows[0].get(sprint), &RawValue::Text("S1".into()));
        assert_eq!(table.rows[0].get(points), &RawValue::Number(5.0));
        assert_eq!(table.rows[0].get(state), &RawValue::Empty);
        assert_eq!(table.rows[1].get(outcome), &RawValue::Text("Added".into()));
        assert_eq!(table.rows[1].get(points), &RawValue::Empty);
    }

    #[test]
    fn test_parse_json_rejects_non_array() {
        let err = parse_json(r#"{"Sprint": "S1"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Format(_)));

        let err = parse_json(r#"[1, 2]"#).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_parse_sprint_list() {
        let content = "Sprint\n\n# current quarter\n  S7 \nS8\n";
        assert_eq!(parse_sprint_list(content), ["S7", "S8"]);
    }

    #[test]
    fn test_parse_sprint_list_without_header() {
        assert_eq!(parse_sprint_list("S1\nS2\n"), ["S1", "S2"]);
        assert!(parse_sprint_list("").is_empty());
    }
}
