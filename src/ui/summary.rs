//! Sprints view rendering.
//!
//! Displays a table of every sprint in the window with committed and
//! accepted points, scope churn and health status.

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use sprintwatch_core::SprintHealth;

use crate::app::App;
use crate::format::{format_pct, format_points, sort_arrow};

/// Column to sort by in the Sprints view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Window order, oldest first.
    #[default]
    Window,
    Sprint,
    Committed,
    Accepted,
    Predictability,
    ScopeChange,
    Status,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Window => SortColumn::Sprint,
            SortColumn::Sprint => SortColumn::Committed,
            SortColumn::Committed => SortColumn::Accepted,
            SortColumn::Accepted => SortColumn::Predictability,
            SortColumn::Predictability => SortColumn::ScopeChange,
            SortColumn::ScopeChange => SortColumn::Status,
            SortColumn::Status => SortColumn::Window,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SortColumn::Window => "window",
            SortColumn::Sprint => "sprint",
            SortColumn::Committed => "committed",
            SortColumn::Accepted => "accepted",
            SortColumn::Predictability => "predictability",
            SortColumn::ScopeChange => "scope",
            SortColumn::Status => "status",
        }
    }
}

/// Render the Sprints view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref analysis) = app.analysis else {
        return;
    };

    let sprints = app.sorted_sprints();

    let header = Row::new(vec![
        Cell::from(format_header("Sprint", SortColumn::Sprint, app)),
        Cell::from(format_header("Committed", SortColumn::Committed, app)),
        Cell::from(format_header("Accepted", SortColumn::Accepted, app)),
        Cell::from("Added"),
        Cell::from("Removed"),
        Cell::from("Unfinished"),
        Cell::from(format_header("Predict.", SortColumn::Predictability, app)),
        Cell::from(format_header("Scope Δ", SortColumn::ScopeChange, app)),
        Cell::from(format_header("Status", SortColumn::Status, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = sprints
        .iter()
        .map(|(_, s)| {
            let status_style = app.theme.status_style(s.status);
            let count = |n: usize, pts: f64| {
                if n == 0 {
                    "-".to_string()
                } else {
                    format!("{} ({})", format_points(pts), n)
                }
            };
            let unfinished = count(s.count_unfinished_committed, s.pts_unfinished_committed);

            Row::new(vec![
                Cell::from(s.sprint.clone()),
                Cell::from(format_points(s.committed_pts)),
                Cell::from(format_points(s.accepted_pts)),
                Cell::from(count(s.count_added, s.added_pts))
                    .style(Style::default().fg(app.theme.added)),
                Cell::from(count(s.count_removed, s.removed_pts))
                    .style(Style::default().fg(app.theme.removed)),
                Cell::from(unfinished)
                    .style(Style::default().fg(app.theme.unfinished)),
                Cell::from(format_pct(s.predictability)).style(status_style),
                Cell::from(format_pct(s.scope_change)),
                Cell::from(s.status.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(9),
        Constraint::Min(9),
        Constraint::Min(6),
    ];

    let last = sprints.len().saturating_sub(1);
    let selected_visual_index = app.selected_sprint_index.min(last);
    let sort_dir = sort_arrow(app.sort_ascending);

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !sprints.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, sprints.len())
    } else {
        String::new()
    };

    let title = format!(
        " Sprints ({}/{}) [s:sort {}{}]{}{} ",
        sprints.len(),
        analysis.report.sprints.len(),
        app.sort_column.label(),
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = sort_arrow(app.sort_ascending);
        Span::raw(format!("{name}{arrow}"))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort sprints by the given column and direction. The `usize` is the
/// sprint's position in the window and breaks ties.
pub fn sort_sprints_by(
    sprints: &mut [(usize, &SprintHealth)],
    column: SortColumn,
    ascending: bool,
) {
    sprints.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Window => a.0.cmp(&b.0),
            SortColumn::Sprint => a.1.sprint.cmp(&b.1.sprint),
            SortColumn::Committed => a.1.committed_pts.total_cmp(&b.1.committed_pts),
            SortColumn::Accepted => a.1.accepted_pts.total_cmp(&b.1.accepted_pts),
            SortColumn::Predictability => a.1.predictability.total_cmp(&b.1.predictability),
            SortColumn::ScopeChange => a.1.scope_change.total_cmp(&b.1.scope_change),
            SortColumn::Status => a.1.status.cmp(&b.1.status),
        };

        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        if primary == Ordering::Equal {
            a.0.cmp(&b.0)
        } else {
            primary
        }
    });
}
