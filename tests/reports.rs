use std::fs;

use sprintwatch::export::{self, HIGHLIGHTS_CSV, NOT_GOOD_ITEMS_CSV, WINDOW_KPIS_CSV};
use sprintwatch::source::read_table;
use sprintwatch::{FileSource, Overrides, Settings, TableSource};
use sprintwatch_core::analyze_table;

const EXPORT: &str = "\
Team,Sprint,Sprint Start,Sprint End,Item Type,Item ID,Story Points Committed,Story Points,State,Outcome
Core,Sprint 1,2024-01-01,2024-01-14,Story,CORE-1,5,5,Accepted,Committed
Core,Sprint 1,2024-01-01,2024-01-14,Story,CORE-2,0,2,New,Added
Core,Sprint 2,2024-01-15,2024-01-28,Story,CORE-3,8,8,In Progress,Committed
Core,Sprint 2,2024-01-15,2024-01-28,Bug,CORE-4,2,2,accepted,Committed
Core,Sprint 2,2024-01-15,2024-01-28,Story,CORE-5,3,3,Accepted,Removed
Core,,,,Story,CORE-6,1,1,Accepted,Committed
";

#[test]
fn csv_export_to_report_set() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sprints.csv");
    fs::write(&input, EXPORT).unwrap();

    let overrides = Overrides {
        sprints: Some("sprint 1, SPRINT 2".into()),
        ..Default::default()
    };
    let config_file = dir.path().join("sprintwatch.toml");
    fs::write(&config_file, "threshold = 0.6\n").unwrap();
    let config_file = Some(config_file.as_path());
    let settings = Settings::load(config_file, &overrides).unwrap();
    let config = settings.analysis_config().unwrap();

    let table = read_table(&input).unwrap();
    let analysis = analyze_table(&table, &config).unwrap();

    assert_eq!(analysis.threshold, 0.6);
    assert_eq!(analysis.window.sprints(), ["sprint 1", "SPRINT 2"]);
    assert_eq!(analysis.record_count, 5);
    assert_eq!(analysis.skipped_rows.len(), 1);

    let out = dir.path().join("reports");
    export::write_reports(&analysis, &out).unwrap();

    let not_good = fs::read_to_string(out.join(NOT_GOOD_ITEMS_CSV)).unwrap();
    let lines: Vec<&str> = not_good.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "SPRINT 2,CORE-3,Committed,In Progress,8,8,Committed Not Accepted,80.00%,3"
    );
    assert_eq!(
        lines[2],
        "SPRINT 2,CORE-5,Removed,Accepted,3,3,Scope Removed,30.00%,5"
    );

    let highlights = fs::read_to_string(out.join(HIGHLIGHTS_CSV)).unwrap();
    let lines: Vec<&str> = highlights.lines().collect();
    assert_eq!(lines, ["Row,Highlight", "3,Unfinished", "5,Removed"]);

    let kpis = fs::read_to_string(out.join(WINDOW_KPIS_CSV)).unwrap();
    assert!(kpis.contains("Avg Accepted Pts,"));
    assert!(kpis.contains("Predictability,"));
}

#[test]
fn json_export_through_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sprints.json");
    fs::write(
        &input,
        r#"[
            {"Team": "Core", "Sprint": "S1", "Item ID": "A", "Story Points Committed": 4,
             "Story Points": 4, "State": "Accepted", "Outcome": "Committed",
             "Sprint Start": null, "Sprint End": null, "Item Type": "Story"}
        ]"#,
    )
    .unwrap();

    let mut source = FileSource::new(&input);
    let table = source.poll().unwrap();
    let analysis = analyze_table(&table, &Default::default()).unwrap();

    assert_eq!(analysis.metrics[0].predictability, 1.0);
    assert!(analysis.coercions.is_empty());

    let report = export::build_report(&analysis, source.description());
    assert_eq!(report["sprint_health"][0]["status"], "Good");
}
