//! Report sinks: JSON export, CSV report set, plain-text summary and the
//! optional numeric write-back into the source CSV.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use sprintwatch_core::{
    Analysis, Coercion, ColumnSchema, HealthStatus, ItemContribution, SchemaVersion,
};
use tracing::{info, warn};

use crate::format::{format_kpi, format_pct, format_points};
use crate::source::TableFormat;

pub const SPRINT_METRICS_CSV: &str = "sprint_metrics.csv";
pub const WINDOW_KPIS_CSV: &str = "window_kpis.csv";
pub const SPRINT_HEALTH_CSV: &str = "sprint_health.csv";
pub const NOT_GOOD_ITEMS_CSV: &str = "not_good_items.csv";
pub const GOOD_ITEMS_CSV: &str = "good_items.csv";
pub const HIGHLIGHTS_CSV: &str = "highlights.csv";

/// Build the JSON report for one analysis.
///
/// Ratios are kept as raw fractions; only the CSV and text sinks render
/// percentages.
pub fn build_report(analysis: &Analysis, source: &str) -> Value {
    let highlights: serde_json::Map<String, Value> = analysis
        .report
        .highlights
        .iter()
        .map(|(row, h)| (row.to_string(), json!(h.label())))
        .collect();

    let kpis: Vec<Value> = analysis
        .kpis
        .pairs()
        .into_iter()
        .map(|(name, value)| json!({ "kpi": name, "value": value }))
        .collect();

    json!({
        "schema_version": SchemaVersion::current(),
        "source": source,
        "config": {
            "threshold": analysis.threshold,
        },
        "window": {
            "source": analysis.window.source().label(),
            "sprints": analysis.window.sprints(),
        },
        "summary": {
            "records": analysis.record_count,
            "skipped_rows": analysis.skipped_rows.len(),
            "coerced_cells": analysis.coercions.len(),
            "good_sprints": analysis.report.count(HealthStatus::Good),
            "not_good_sprints": analysis.report.count(HealthStatus::NotGood),
        },
        "sprint_metrics": analysis.metrics,
        "window_kpis": kpis,
        "sprint_health": analysis.report.sprints,
        "not_good_items": analysis.report.not_good_items,
        "good_items": analysis.report.good_items,
        "highlights": highlights,
    })
}

/// Write the JSON report to `path`.
pub fn export_json(analysis: &Analysis, source: &str, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&build_report(analysis, source))?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "exported JSON report");
    Ok(())
}

/// Write the CSV report set into `dir`, creating it if needed.
///
/// Returns the paths written, in a fixed order.
pub fn write_reports(analysis: &Analysis, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::new();

    let path = dir.join(SPRINT_METRICS_CSV);
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record([
        "Sprint",
        "Committed Pts",
        "Accepted Pts",
        "Added Pts",
        "Removed Pts",
        "Predictability",
        "Scope Change",
        "Items Added",
        "Items Removed",
        "Unfinished Committed",
        "Unfinished Committed Pts",
    ])?;
    for m in &analysis.metrics {
        wtr.write_record([
            m.sprint.clone(),
            format_points(m.committed_pts),
            format_points(m.accepted_pts),
            format_points(m.added_pts),
            format_points(m.removed_pts),
            format_pct(m.predictability),
            format_pct(m.scope_change),
            m.count_added.to_string(),
            m.count_removed.to_string(),
            m.count_unfinished_committed.to_string(),
            format_points(m.pts_unfinished_committed),
        ])?;
    }
    wtr.flush()?;
    written.push(path);

    let path = dir.join(WINDOW_KPIS_CSV);
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["KPI", "Value"])?;
    for (name, value) in analysis.kpis.pairs() {
        wtr.write_record([name.to_string(), format_kpi(name, value)])?;
    }
    wtr.flush()?;
    written.push(path);

    let path = dir.join(SPRINT_HEALTH_CSV);
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record([
        "Sprint",
        "Health",
        "Predictability",
        "Scope Change",
        "Committed Pts",
        "Accepted Pts",
    ])?;
    for s in &analysis.report.sprints {
        wtr.write_record([
            s.sprint.clone(),
            s.status.label().to_string(),
            format_pct(s.predictability),
            format_pct(s.scope_change),
            format_points(s.committed_pts),
            format_points(s.accepted_pts),
        ])?;
    }
    wtr.flush()?;
    written.push(path);

    for (name, items) in [
        (NOT_GOOD_ITEMS_CSV, &analysis.report.not_good_items),
        (GOOD_ITEMS_CSV, &analysis.report.good_items),
    ] {
        let path = dir.join(name);
        write_items(&path, items)?;
        written.push(path);
    }

    let path = dir.join(HIGHLIGHTS_CSV);
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["Row", "Highlight"])?;
    for (row, highlight) in &analysis.report.highlights {
        wtr.write_record([row.to_string(), highlight.label().to_string()])?;
    }
    wtr.flush()?;
    written.push(path);

    info!(dir = %dir.display(), files = written.len(), "wrote CSV reports");
    Ok(written)
}

fn write_items(path: &Path, items: &[ItemContribution]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "Sprint",
        "Item ID",
        "Outcome",
        "State",
        "Story Points Committed",
        "Story Points",
        "Reason",
        "Contribution",
        "Row",
    ])?;
    for item in items {
        wtr.write_record([
            item.sprint.clone(),
            item.item_id.clone(),
            item.outcome.clone(),
            item.state.clone(),
            format_points(item.committed_pts),
            format_points(item.story_points),
            item.reason.label().to_string(),
            format_pct(item.contribution_pct),
            item.row.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Plain-text rendering of an analysis for `--print`.
pub fn render_text(analysis: &Analysis) -> String {
    let mut out = String::new();
    let source = analysis.window.source().label();
    let window = analysis.window.sprints().join(", ");

    let _ = writeln!(out, "Window ({source}): {window}");
    let _ = writeln!(out, "Threshold: {}", format_pct(analysis.threshold));
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<16} {:>10} {:>10} {:>8} {:>8} {:>15} {:>13}  {}",
        "Sprint",
        "Committed",
        "Accepted",
        "Added",
        "Removed",
        "Predictability",
        "Scope Change",
        "Health"
    );
    for (m, h) in analysis.metrics.iter().zip(&analysis.report.sprints) {
        let _ = writeln!(
            out,
            "{:<16} {:>10} {:>10} {:>8} {:>8} {:>15} {:>13}  {}",
            m.sprint,
            format_points(m.committed_pts),
            format_points(m.accepted_pts),
            format_points(m.added_pts),
            format_points(m.removed_pts),
            format_pct(m.predictability),
            format_pct(m.scope_change),
            h.status.label(),
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Window KPIs");
    for (name, value) in analysis.kpis.pairs() {
        let _ = writeln!(out, "  {:<24} {:>10}", name, format_kpi(name, value));
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Items: {} in NotGood sprints, {} in Good sprints, {} highlighted rows",
        analysis.report.not_good_items.len(),
        analysis.report.good_items.len(),
        analysis.report.highlights.len(),
    );
    for item in &analysis.report.not_good_items {
        let _ = writeln!(
            out,
            "  {:<16} {:<14} {:<24} {:>8}",
            item.sprint,
            item.item_id,
            item.reason.label(),
            format_pct(item.contribution_pct),
        );
    }

    out
}

/// Rewrite coerced point cells of a CSV source with their numeric values.
///
/// Returns the number of cells changed. Non-CSV sources are left untouched.
pub fn write_back(path: &Path, coercions: &[Coercion]) -> Result<usize> {
    if coercions.is_empty() {
        return Ok(0);
    }
    if TableFormat::from_path(path) != TableFormat::Csv {
        warn!(path = %path.display(), "numeric write-back only supports CSV sources");
        return Ok(0);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    // Raw bytes, so cells that are not valid UTF-8 are written back untouched
    let mut rows: Vec<Vec<Vec<u8>>> = rdr
        .byte_records()
        .map(|r| r.map(|rec| rec.iter().map(<[u8]>::to_vec).collect()))
        .collect::<Result<_, _>>()?;

    let headers: Vec<String> = rows
        .first()
        .map(|h| h.iter().map(|b| header_text(b)).collect())
        .unwrap_or_default();
    let schema = ColumnSchema::resolve(&headers)?;

    let mut changed = 0;
    for coercion in coercions {
        let col = schema.index(coercion.column);
        // Row references are 1-based data rows; index 0 is the header
        let Some(fields) = rows.get_mut(coercion.row.index() as usize) else {
            continue;
        };
        if fields.len() <= col {
            fields.resize(col + 1, Vec::new());
        }
        fields[col] = format_points(coercion.value).into_bytes();
        changed += 1;
    }

    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    for fields in &rows {
        wtr.write_record(fields)?;
    }
    wtr.flush()?;

    info!(path = %path.display(), cells = changed, "wrote coerced points back to source");
    Ok(changed)
}

fn header_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_start_matches('\u{feff}')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintwatch_core::{analyze, analyze_table, AnalysisConfig, RowRef, WorkItemRecord};

    use crate::source::read_table;

    const HEADER: &str = "Team,Sprint,Sprint Start,Sprint End,Item Type,Item ID,\
                          Story Points Committed,Story Points,State,Outcome\n";

    fn sample() -> Analysis {
        let records = vec![
            WorkItemRecord::builder()
                .sprint("S1")
                .item_id("A-1")
                .row(RowRef::new(1))
                .committed_pts(5.0)
                .story_points(5.0)
                .state("Accepted")
                .outcome("Committed")
                .build(),
            WorkItemRecord::builder()
                .sprint("S2")
                .item_id("A-2")
                .row(RowRef::new(2))
                .committed_pts(10.0)
                .story_points(10.0)
                .state("In Progress")
                .outcome("Committed")
                .build(),
            WorkItemRecord::builder()
                .sprint("S2")
                .item_id("A-3")
                .row(RowRef::new(3))
                .story_points(2.0)
                .state("New")
                .outcome("Added")
                .build(),
        ];
        analyze(&records, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_build_report_shape() {
        let report = build_report(&sample(), "file: sprints.csv");

        assert_eq!(report["source"], "file: sprints.csv");
        assert_eq!(report["config"]["threshold"], 0.9);
        assert_eq!(report["window"]["source"], "last-n");
        assert_eq!(report["window"]["sprints"], json!(["S1", "S2"]));
        assert_eq!(report["summary"]["not_good_sprints"], 1);
        assert_eq!(report["sprint_metrics"].as_array().unwrap().len(), 2);
        assert_eq!(report["window_kpis"].as_array().unwrap().len(), 7);
        assert_eq!(report["not_good_items"].as_array().unwrap().len(), 2);
        assert_eq!(report["good_items"].as_array().unwrap().len(), 0);
        assert_eq!(report["highlights"].as_object().unwrap().len(), 2);
        assert_eq!(report["highlights"]["2"], "Unfinished");
        assert_eq!(report["highlights"]["3"], "Added");
    }

    #[test]
    fn test_export_json_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        export_json(&sample(), "test", &path).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["source"], "test");
    }

    #[test]
    fn test_write_reports_creates_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");

        let written = write_reports(&sample(), &out).unwrap();
        assert_eq!(written.len(), 6);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
        }

        let health = fs::read_to_string(out.join(SPRINT_HEALTH_CSV)).unwrap();
        let lines: Vec<&str> = health.lines().collect();
        assert_eq!(
            lines[0],
            "Sprint,Health,Predictability,Scope Change,Committed Pts,Accepted Pts"
        );
        assert_eq!(lines[1], "S1,Good,100.00%,0.00%,5,5");
        assert_eq!(lines[2], "S2,NotGood,0.00%,20.00%,10,0");
    }

    #[test]
    fn test_render_text_lists_window_and_kpis() {
        let text = render_text(&sample());
        assert!(text.starts_with("Window (last-n): S1, S2"));
        assert!(text.contains("Threshold: 90.00%"));
        assert!(text.contains("Avg Accepted Pts"));
        assert!(text.contains("A-2"));
    }

    #[test]
    fn test_write_back_rewrites_point_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprints.csv");
        let rows = "Core,S1,,,Story,A-1,5.0,\"1,000\",Accepted,Committed\n\
                    Core,S1,,,Story,A-2,3,,New,Added\n";
        fs::write(&path, format!("{HEADER}{rows}")).unwrap();

        let table = read_table(&path).unwrap();
        let analysis = analyze_table(&table, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.coercions.len(), 3);

        let changed = write_back(&path, &analysis.coercions).unwrap();
        assert_eq!(changed, 3);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "Core,S1,,,Story,A-1,5,1000,Accepted,Committed");
        assert_eq!(lines[2], "Core,S1,,,Story,A-2,3,0,New,Added");

        let table = read_table(&path).unwrap();
        let again = analyze_table(&table, &Default::default()).unwrap();
        assert!(again.coercions.is_empty());
    }

    #[test]
    fn test_write_back_keeps_undecodable_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprints.csv");
        let mut data = HEADER.as_bytes().to_vec();
        data.extend_from_slice(b"Core,S1,,,Story,Caf\xE9,2,x,Accepted,Committed\n");
        fs::write(&path, &data).unwrap();

        let table = read_table(&path).unwrap();
        let analysis = analyze_table(&table, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.record_count, 1);
        assert_eq!(analysis.coercions.len(), 1);

        assert_eq!(write_back(&path, &analysis.coercions).unwrap(), 1);

        let expected = b"Core,S1,,,Story,Caf\xE9,2,0,Accepted,Committed\n";
        assert!(fs::read(&path).unwrap().ends_with(expected));
    }

    #[test]
    fn test_write_back_skips_json_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprints.json");
        fs::write(&path, "[]").unwrap();

        let coercion = Coercion {
            row: RowRef::new(1),
            column: sprintwatch_core::Column::StoryPoints,
            original: "x".into(),
            value: 0.0,
        };
        assert_eq!(write_back(&path, &[coercion]).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
