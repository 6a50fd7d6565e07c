//! KPIs view rendering: window-wide figures and sparkline trends.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use sprintwatch_core::{HealthStatus, KPI_PREDICTABILITY};

use crate::app::App;
use crate::format::{format_kpi, format_pct, format_points};
use crate::trend;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref analysis) = app.analysis else {
        return;
    };

    let chunks = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let rows: Vec<Row> = analysis
        .kpis
        .pairs()
        .into_iter()
        .map(|(name, value)| {
            let style = if name == KPI_PREDICTABILITY {
                let status = if value >= analysis.threshold {
                    HealthStatus::Good
                } else {
                    HealthStatus::NotGood
                };
                app.theme.status_style(status)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(format_kpi(name, value)).style(style),
            ])
        })
        .collect();

    let title = format!(" Window KPIs ({} sprints) ", analysis.window.len());
    let table = Table::new(rows, [Constraint::Fill(2), Constraint::Fill(1)])
        .header(Row::new(vec!["KPI", "Value"]).style(app.theme.header))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
    frame.render_widget(table, chunks[0]);

    let bold = Style::new().bold();
    let delta = match trend::accepted_delta(&analysis.metrics) {
        Some(d) if d > 0.0 => format!("+{}", format_points(d)),
        Some(d) => format_points(d),
        None => "-".to_string(),
    };
    let sprints = analysis.window.sprints();
    let first = sprints.first().map_or("-", String::as_str);
    let last = sprints.last().map_or("-", String::as_str);

    let lines = vec![
        Line::from(vec![
            Span::raw(" Window: "),
            Span::styled(format!("{} .. {}", first, last), bold),
            Span::raw(format!(" ({})", analysis.window.source().label())),
        ]),
        Line::from(vec![
            Span::raw(" Threshold: "),
            Span::styled(format_pct(analysis.threshold), bold),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(" Accepted points", app.theme.header)]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                trend::accepted_sparkline(&analysis.metrics),
                Style::default().fg(app.theme.highlight),
            ),
            Span::raw(format!("  last change {}", delta)),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(" Predictability", app.theme.header)]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                trend::predictability_sparkline(&analysis.metrics),
                Style::default().fg(app.theme.highlight),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Trend ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(paragraph, chunks[1]);
}
