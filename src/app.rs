//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use sprintwatch_core::{analyze_table, Analysis, AnalysisConfig, SprintHealth};
use tracing::{debug, warn};

use crate::export;
use crate::source::TableSource;
use crate::ui::items::{sort_items_by, ItemEntry, ItemSortColumn};
use crate::ui::summary::{sort_sprints_by, SortColumn};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Sprint detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Per-sprint metrics with health status.
    Sprints,
    /// Items blamed for each sprint's result.
    Items,
    /// Window-wide KPIs and trend.
    Kpis,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Sprints => View::Items,
            View::Items => View::Kpis,
            View::Kpis => View::Sprints,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::Sprints => View::Kpis,
            View::Items => View::Sprints,
            View::Kpis => View::Items,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Sprints => "Sprints",
            View::Items => "Items",
            View::Kpis => "KPIs",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn TableSource>,
    pub config: AnalysisConfig,
    pub analysis: Option<Analysis>,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,

    // Navigation state
    pub selected_sprint_index: usize,
    pub selected_item_index: usize,

    // Sorting (Sprints view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Sorting (Items view)
    pub item_sort_column: ItemSortColumn,
    pub item_sort_ascending: bool,
    pub show_good_items: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source` and analyzing with `config`.
    pub fn new(source: Box<dyn TableSource>, config: AnalysisConfig) -> Self {
        Self {
            running: true,
            current_view: View::Sprints,
            show_help: false,
            show_detail_overlay: false,
            source,
            config,
            analysis: None,
            load_error: None,
            last_updated: None,
            selected_sprint_index: 0,
            selected_item_index: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            item_sort_column: ItemSortColumn::default(),
            item_sort_ascending: false,
            show_good_items: true,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the source and re-run the analysis on new data.
    ///
    /// Returns true if a new analysis replaced the current one. On failure
    /// the previous analysis stays on screen and `load_error` is set.
    pub fn reload_data(&mut self) -> bool {
        let Some(table) = self.source.poll() else {
            if let Some(err) = self.source.error() {
                self.load_error = Some(err.to_string());
            }
            return false;
        };

        match analyze_table(&table, &self.config) {
            Ok(analysis) => {
                debug!(
                    rows = table.len(),
                    sprints = analysis.window.len(),
                    "reloaded"
                );
                self.analysis = Some(analysis);
                self.load_error = None;
                self.last_updated = Some(Instant::now());
                self.clamp_selection();
                true
            }
            Err(e) => {
                warn!(error = %e, "analysis failed, keeping previous result");
                self.load_error = Some(e.to_string());
                false
            }
        }
    }

    /// Reload even if the source reports no change.
    pub fn force_reload(&mut self) {
        self.source.invalidate();
        if self.reload_data() {
            self.set_status_message("Reloaded".to_string());
        }
    }

    fn clamp_selection(&mut self) {
        let sprints = self.sorted_sprints().len();
        let items = self.sorted_items().len();
        self.selected_sprint_index = self.selected_sprint_index.min(sprints.saturating_sub(1));
        self.selected_item_index = self.selected_item_index.min(items.saturating_sub(1));
    }

    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.show_detail_overlay = false;
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n rows of the visible (filtered, sorted) list.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Sprints => {
                let max = self.sorted_sprints().len().saturating_sub(1);
                self.selected_sprint_index = (self.selected_sprint_index + n).min(max);
            }
            View::Items => {
                let max = self.sorted_items().len().saturating_sub(1);
                self.selected_item_index = (self.selected_item_index + n).min(max);
            }
            View::Kpis => {}
        }
    }

    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Sprints => {
                self.selected_sprint_index = self.selected_sprint_index.saturating_sub(n);
            }
            View::Items => {
                self.selected_item_index = self.selected_item_index.saturating_sub(n);
            }
            View::Kpis => {}
        }
    }

    pub fn select_first(&mut self) {
        match self.current_view {
            View::Sprints => self.selected_sprint_index = 0,
            View::Items => self.selected_item_index = 0,
            View::Kpis => {}
        }
    }

    pub fn select_last(&mut self) {
        match self.current_view {
            View::Sprints => {
                self.selected_sprint_index = self.sorted_sprints().len().saturating_sub(1);
            }
            View::Items => {
                self.selected_item_index = self.sorted_items().len().saturating_sub(1);
            }
            View::Kpis => {}
        }
    }

    /// Sprint health rows after filtering and sorting, paired with their
    /// window position.
    pub fn sorted_sprints(&self) -> Vec<(usize, &SprintHealth)> {
        let Some(ref analysis) = self.analysis else {
            return Vec::new();
        };
        let mut sprints: Vec<(usize, &SprintHealth)> = analysis
            .report
            .sprints
            .iter()
            .enumerate()
            .filter(|(_, s)| self.matches_filter(&s.sprint))
            .collect();
        sort_sprints_by(&mut sprints, self.sort_column, self.sort_ascending);
        sprints
    }

    /// Contributing items after filtering and sorting. NotGood items come
    /// first; Good items are included only when toggled on.
    pub fn sorted_items(&self) -> Vec<ItemEntry<'_>> {
        let Some(ref analysis) = self.analysis else {
            return Vec::new();
        };
        let mut items = ItemEntry::collect(&analysis.report, self.show_good_items);
        items.retain(|entry| {
            let item = entry.item;
            self.matches_filter(&item.sprint)
                || self.matches_filter(&item.item_id)
                || self.matches_filter(&item.state)
                || self.matches_filter(&item.outcome)
        });
        sort_items_by(&mut items, self.item_sort_column, self.item_sort_ascending);
        items
    }

    /// The sprint the detail overlay describes.
    ///
    /// In the Items view this is the sprint of the selected item.
    pub fn detail_sprint(&self) -> Option<&SprintHealth> {
        match self.current_view {
            View::Sprints => self
                .sorted_sprints()
                .get(self.selected_sprint_index)
                .map(|(_, s)| *s),
            View::Items => {
                let sprint = self
                    .sorted_items()
                    .get(self.selected_item_index)
                    .map(|entry| entry.item.sprint.clone())?;
                self.analysis.as_ref()?.report.sprint(&sprint)
            }
            View::Kpis => None,
        }
    }

    /// Open the detail overlay for the current selection.
    pub fn enter_detail(&mut self) {
        if self.detail_sprint().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to the Sprints view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.current_view != View::Sprints {
            self.current_view = View::Sprints;
        }
    }

    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Show or hide items from Good sprints in the Items view.
    pub fn toggle_good_items(&mut self) {
        self.show_good_items = !self.show_good_items;
        self.clamp_selection();
    }

    /// Cycle to the next sort column for the current view.
    pub fn cycle_sort(&mut self) {
        match self.current_view {
            View::Sprints => self.sort_column = self.sort_column.next(),
            View::Items => self.item_sort_column = self.item_sort_column.next(),
            View::Kpis => {}
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        match self.current_view {
            View::Sprints => self.sort_ascending = !self.sort_ascending,
            View::Items => self.item_sort_ascending = !self.item_sort_ascending,
            View::Kpis => {}
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.selected_sprint_index = 0;
        self.selected_item_index = 0;
    }

    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Case-insensitive substring match against the current filter.
    pub fn matches_filter(&self, text: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let needle = self.filter_text.to_lowercase();
        text.to_lowercase().contains(&needle)
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current analysis as a JSON report.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref analysis) = self.analysis else {
            anyhow::bail!("No data to export");
        };
        export::export_json(analysis, self.source.description(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use sprintwatch_core::{Column, HealthStatus, RawTable, RawValue};
    use tokio::sync::watch;

    fn table(rows: &[(&str, &str, &str, &str, &str, &str)]) -> RawTable {
        let mut t = RawTable::new(Column::ALL.iter().map(|c| c.header().to_string()).collect());
        for (sprint, id, committed, points, state, outcome) in rows {
            t.push_row(vec![
                RawValue::text("Core"),
                RawValue::text(*sprint),
                RawValue::Empty,
                RawValue::Empty,
                RawValue::text("Story"),
                RawValue::text(*id),
                RawValue::text(*committed),
                RawValue::text(*points),
                RawValue::text(*state),
                RawValue::text(*outcome),
            ]);
        }
        t
    }

    fn sample() -> RawTable {
        table(&[
            ("S1", "A-1", "5", "5", "Accepted", "Committed"),
            ("S1", "A-2", "0", "2", "New", "Added"),
            ("S2", "B-1", "8", "8", "In Progress", "Committed"),
            ("S2", "B-2", "2", "2", "Accepted", "Committed"),
        ])
    }

    fn app_with(table: RawTable) -> (watch::Sender<RawTable>, App) {
        let (tx, source) = ChannelSource::create("test");
        tx.send(table).unwrap();
        let mut app = App::new(Box::new(source), AnalysisConfig::default());
        app.theme = Theme::dark();
        assert!(app.reload_data());
        (tx, app)
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Sprints.next(), View::Items);
        assert_eq!(View::Kpis.next(), View::Sprints);
        assert_eq!(View::Sprints.prev(), View::Kpis);
    }

    #[test]
    fn test_reload_runs_analysis() {
        let (_tx, app) = app_with(sample());
        let analysis = app.analysis.as_ref().unwrap();

        assert_eq!(analysis.window.sprints(), ["S1", "S2"]);
        assert_eq!(analysis.report.count(HealthStatus::NotGood), 1);
        assert!(app.load_error.is_none());
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn test_failed_reload_keeps_previous_analysis() {
        let (tx, mut app) = app_with(sample());

        let mut broken = RawTable::new(vec!["Sprint".into()]);
        broken.push_row(vec![RawValue::text("S3")]);
        tx.send(broken).unwrap();

        assert!(!app.reload_data());
        let err = app.load_error.as_deref().unwrap();
        assert!(err.contains("Missing required columns"));
        assert_eq!(app.analysis.as_ref().unwrap().window.len(), 2);
    }

    #[test]
    fn test_items_not_good_first_and_toggle() {
        let (_tx, mut app) = app_with(sample());

        let items = app.sorted_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].status, HealthStatus::NotGood);
        assert_eq!(items[0].item.item_id, "B-1");

        app.toggle_good_items();
        let items = app.sorted_items();
        assert_eq!(items.len(), 1);
        assert!(items.iter().all(|e| e.status == HealthStatus::NotGood));
    }

    #[test]
    fn test_filter_narrows_sprints() {
        let (_tx, mut app) = app_with(sample());

        app.filter_push('2');
        let sprints = app.sorted_sprints();
        assert_eq!(sprints.len(), 1);
        assert_eq!(sprints[0].1.sprint, "S2");

        app.clear_filter();
        assert_eq!(app.sorted_sprints().len(), 2);
    }

    #[test]
    fn test_selection_is_clamped() {
        let (_tx, mut app) = app_with(sample());

        app.select_next_n(10);
        assert_eq!(app.selected_sprint_index, 1);
        app.select_prev_n(10);
        assert_eq!(app.selected_sprint_index, 0);
        app.select_last();
        assert_eq!(app.selected_sprint_index, 1);
    }

    #[test]
    fn test_detail_follows_view() {
        let (_tx, mut app) = app_with(sample());

        app.enter_detail();
        assert!(app.show_detail_overlay);
        assert_eq!(app.detail_sprint().unwrap().sprint, "S1");

        app.go_back();
        assert!(!app.show_detail_overlay);

        app.set_view(View::Items);
        assert_eq!(app.detail_sprint().unwrap().sprint, "S2");

        app.set_view(View::Kpis);
        app.enter_detail();
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn test_export_state() {
        let (_tx, app) = app_with(sample());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        app.export_state(&path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "channel: test");
    }

    #[test]
    fn test_export_without_data_fails() {
        let (_tx, source) = ChannelSource::create("empty");
        let app = App::new(Box::new(source), AnalysisConfig::default());
        assert!(app.export_state(Path::new("unused.json")).is_err());
    }
}
