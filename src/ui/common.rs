//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};
use sprintwatch_core::HealthStatus;

use crate::app::{App, View};
use crate::format::format_pct;

/// Render the header bar with the window's health overview.
///
/// Displays: status indicator, sprint counts by health, window predictability.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::new().bold();
    let Some(ref analysis) = app.analysis else {
        let line = Line::from(vec![
            Span::styled(" SPRINTWATCH ", bold),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let good = analysis.report.count(HealthStatus::Good);
    let not_good = analysis.report.count(HealthStatus::NotGood);
    let overall = if not_good > 0 {
        HealthStatus::NotGood
    } else {
        HealthStatus::Good
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.status_style(overall)),
        Span::styled("SPRINTWATCH ", bold),
        Span::raw("│ "),
        Span::styled(format!("{}", good), Style::default().fg(app.theme.good)),
        Span::raw(" good "),
        if not_good > 0 {
            Span::styled(
                format!("{}", not_good),
                Style::new().fg(app.theme.not_good).bold(),
            )
        } else {
            Span::styled("0", Style::new().dim())
        },
        Span::raw(" not good │ "),
        Span::styled(format!("{}", analysis.record_count), bold),
        Span::raw(" items │ predictability "),
        Span::styled(format_pct(analysis.kpis.predictability), bold),
        Span::raw(" │ volatility "),
        Span::raw(format_pct(analysis.kpis.volatility)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Sprints "),
        Line::from(" 2:Items "),
        Line::from(" 3:KPIs "),
    ];

    let selected = match app.current_view {
        View::Sprints => 0,
        View::Items => 1,
        View::Kpis => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: current view, window source, threshold, time since last update,
/// available controls. Errors and temporary messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let style = Style::new().fg(app.theme.highlight);
        let paragraph = Paragraph::new(format!(" {msg} ")).style(style);
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let suffix = if app.analysis.is_some() {
            " (showing last good result)"
        } else {
            ""
        };
        let text = format!(" Error: {err}{suffix} | r:retry q:quit");
        let paragraph = Paragraph::new(text).style(Style::new().fg(app.theme.not_good));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref analysis) = app.analysis {
        let elapsed = app
            .last_updated
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or_default();

        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            match app.current_view {
                View::Sprints => "/:search s:sort S:reverse Enter:detail ?:help q:quit",
                View::Items => "/:search s:sort g:good Enter:detail ?:help q:quit",
                View::Kpis => "Tab:switch e:export r:reload ?:help q:quit",
            }
        };

        format!(
            " {} | {} window, threshold {} | {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            analysis.window.source().label(),
            format_pct(analysis.threshold),
            app.source_description(),
            elapsed,
            controls,
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::new().dim());

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::new().bold();
    let dim = Style::new().dim();
    let section = |title: &'static str| Line::from(vec![Span::styled(title, bold)]);

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  1/2/3       Sprints / Items / KPIs"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Sprint detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Sprints & Items"),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from("  g         Show/hide Good items"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled("Press any key to close", dim)]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
