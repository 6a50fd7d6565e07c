//! Items view rendering.
//!
//! Lists every item blamed for its sprint's result: items of NotGood sprints
//! first, coloured by highlight category, then (optionally) items of Good
//! sprints.

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use sprintwatch_core::{HealthReport, HealthStatus, ItemContribution};

use crate::app::App;
use crate::format::{format_pct, format_points, sort_arrow};

/// Column to sort items by. NotGood items always stay ahead of Good ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemSortColumn {
    #[default]
    Contribution,
    Sprint,
    Item,
    Reason,
}

impl ItemSortColumn {
    pub fn next(self) -> Self {
        match self {
            Self::Contribution => Self::Sprint,
            Self::Sprint => Self::Item,
            Self::Item => Self::Reason,
            Self::Reason => Self::Contribution,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Contribution => "contribution",
            Self::Sprint => "sprint",
            Self::Item => "item",
            Self::Reason => "reason",
        }
    }
}

/// One row of the Items view.
#[derive(Debug, Clone, Copy)]
pub struct ItemEntry<'a> {
    pub item: &'a ItemContribution,
    /// Status of the item's sprint.
    pub status: HealthStatus,
    /// Position in report order, used to break ties.
    pub order: usize,
}

impl<'a> ItemEntry<'a> {
    /// Items in report order: NotGood items, then Good items if requested.
    pub fn collect(report: &'a HealthReport, include_good: bool) -> Vec<Self> {
        let not_good = report
            .not_good_items
            .iter()
            .map(|item| (item, HealthStatus::NotGood));
        let good = report
            .good_items
            .iter()
            .filter(|_| include_good)
            .map(|item| (item, HealthStatus::Good));

        not_good
            .chain(good)
            .enumerate()
            .map(|(order, (item, status))| ItemEntry {
                item,
                status,
                order,
            })
            .collect()
    }
}

/// Render the Items view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref analysis) = app.analysis else {
        return;
    };

    let items = app.sorted_items();
    let report = &analysis.report;

    if items.is_empty() && app.filter_text.is_empty() {
        render_empty_message(frame, app, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Health"),
        Cell::from(format_header("Sprint", ItemSortColumn::Sprint, app)),
        Cell::from(format_header("Item", ItemSortColumn::Item, app)),
        Cell::from("Outcome"),
        Cell::from("State"),
        Cell::from("Committed"),
        Cell::from("Points"),
        Cell::from(format_header("Reason", ItemSortColumn::Reason, app)),
        Cell::from(format_header("Share", ItemSortColumn::Contribution, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = items
        .iter()
        .map(|entry| {
            let item = entry.item;
            let row_style = match report.highlights.get(&item.row) {
                Some(highlight) => app.theme.highlight_style(*highlight),
                None => Style::new().dim(),
            };

            let status_style = app.theme.status_style(entry.status);

            Row::new(vec![
                Cell::from(entry.status.symbol()).style(status_style),
                Cell::from(item.sprint.clone()),
                Cell::from(item.item_id.clone()),
                Cell::from(item.outcome.clone()),
                Cell::from(item.state.clone()),
                Cell::from(format_points(item.committed_pts)),
                Cell::from(format_points(item.story_points)),
                Cell::from(item.reason.label()),
                Cell::from(format_pct(item.contribution_pct)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(9),
        Constraint::Min(6),
        Constraint::Fill(2),
        Constraint::Min(8),
    ];

    let last = items.len().saturating_sub(1);
    let selected_index = app.selected_item_index.min(last);
    let not_good = items
        .iter()
        .filter(|e| e.status == HealthStatus::NotGood)
        .count();
    let sort_dir = sort_arrow(app.item_sort_ascending);
    let good_info = if app.show_good_items {
        "g:hide good"
    } else {
        "g:show good"
    };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let title = format!(
        " Items ({} not good, {} good) [s:sort {}{}] [{}]{} ",
        not_good,
        items.len() - not_good,
        app.item_sort_column.label(),
        sort_dir,
        good_info,
        filter_info,
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
    state.select(Some(selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_empty_message(frame: &mut Frame, app: &App, area: Rect) {
    let good = Style::new().fg(app.theme.good).bold();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No contributing items", good)),
        Line::from(""),
        Line::from("Every committed item was accepted; scope held steady."),
    ];

    let block = Block::default()
        .title(" Items ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn format_header(name: &str, col: ItemSortColumn, app: &App) -> Span<'static> {
    if app.item_sort_column == col {
        let arrow = sort_arrow(app.item_sort_ascending);
        Span::raw(format!("{name}{arrow}"))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort items: NotGood group first, then by column and direction, then by
/// report order.
pub fn sort_items_by(items: &mut [ItemEntry<'_>], column: ItemSortColumn, ascending: bool) {
    items.sort_by(|a, b| {
        let group = b.status.cmp(&a.status);
        if group != Ordering::Equal {
            return group;
        }

        let primary = match column {
            ItemSortColumn::Contribution => {
                a.item.contribution_pct.total_cmp(&b.item.contribution_pct)
            }
            // Report order is already window order within each group
            ItemSortColumn::Sprint => a.order.cmp(&b.order),
            ItemSortColumn::Item => a.item.item_id.cmp(&b.item.item_id),
            ItemSortColumn::Reason => a.item.reason.label().cmp(b.item.reason.label()),
        };

        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        if primary == Ordering::Equal {
            a.order.cmp(&b.order)
        } else {
            primary
        }
    });
}
