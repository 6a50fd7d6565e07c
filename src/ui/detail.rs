//! Detail overlay rendering.
//!
//! Displays a modal overlay for one sprint: its metrics and every item that
//! contributed to its result.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::format::{format_pct, format_points};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the sprint detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref analysis) = app.analysis else {
        return;
    };
    let Some(sprint) = app.detail_sprint() else {
        return;
    };

    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 110);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(6),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let status_style = app.theme.status_style(sprint.status);
    let bold = Style::new().bold();
    let dim = Style::new().dim();
    let threshold = format_pct(analysis.threshold);

    let header_lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", sprint.sprint), bold),
            Span::styled(
                format!("{} {}", sprint.status.symbol(), sprint.status.label()),
                status_style.bold(),
            ),
        ]),
        Line::from(vec![
            Span::raw(" Committed: "),
            Span::styled(format_points(sprint.committed_pts), bold),
            Span::raw("    Accepted: "),
            Span::styled(format_points(sprint.accepted_pts), bold),
            Span::raw("    Predictability: "),
            Span::styled(format_pct(sprint.predictability), status_style),
            Span::raw(format!("  (threshold {threshold})")),
        ]),
        Line::from(vec![
            Span::raw(" Added: "),
            Span::styled(
                points_and_items(sprint.added_pts, sprint.count_added),
                Style::default().fg(app.theme.added),
            ),
            Span::raw("    Removed: "),
            Span::styled(
                points_and_items(sprint.removed_pts, sprint.count_removed),
                Style::default().fg(app.theme.removed),
            ),
            Span::raw("    Scope change: "),
            Span::styled(format_pct(sprint.scope_change), bold),
        ]),
        Line::from(vec![
            Span::raw(" Unfinished committed: "),
            Span::styled(
                points_and_items(
                    sprint.pts_unfinished_committed,
                    sprint.count_unfinished_committed,
                ),
                Style::default().fg(app.theme.unfinished),
            ),
        ]),
    ];

    let header = Paragraph::new(header_lines).block(
        Block::default()
            .title(" Sprint Detail ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.highlight)),
    );
    frame.render_widget(header, chunks[0]);

    // ===== CONTRIBUTING ITEMS =====
    let items: Vec<_> = analysis.report.items_for(&sprint.sprint).collect();

    if items.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  No contributing items", dim)),
        ])
        .block(
            Block::default()
                .title(" Items (0) ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
        frame.render_widget(empty, chunks[1]);
    } else {
        let header = Row::new(vec![
            Cell::from("Row"),
            Cell::from("Item"),
            Cell::from("Outcome"),
            Cell::from("State"),
            Cell::from("Committed"),
            Cell::from("Points"),
            Cell::from("Reason"),
            Cell::from("Share"),
        ])
        .height(1)
        .style(app.theme.header);

        let rows: Vec<Row> = items
            .iter()
            .map(|item| {
                let style = analysis
                    .report
                    .highlights
                    .get(&item.row)
                    .map(|h| app.theme.highlight_style(*h))
                    .unwrap_or_default();
                Row::new(vec![
                    Cell::from(item.row.to_string()),
                    Cell::from(item.item_id.clone()),
                    Cell::from(item.outcome.clone()),
                    Cell::from(item.state.clone()),
                    Cell::from(format_points(item.committed_pts)),
                    Cell::from(format_points(item.story_points)),
                    Cell::from(item.reason.label()),
                    Cell::from(format_pct(item.contribution_pct)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Fill(2),
            Constraint::Length(9),
        ];

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .title(format!(" Items ({}) ", items.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
        frame.render_widget(table, chunks[1]);
    }

    // ===== FOOTER =====
    let footer = Line::from(Span::styled(" ↑↓:prev/next sprint  Esc:close ", dim));
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}

fn points_and_items(points: f64, count: usize) -> String {
    format!("{} pts / {count} items", format_points(points))
}
