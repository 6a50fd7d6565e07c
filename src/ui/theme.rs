//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Style, Stylize};
use ratatui::widgets::block::BorderType;
use sprintwatch_core::{HealthStatus, Highlight};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Sprints at or above the threshold.
    pub good: Color,
    /// Sprints below the threshold.
    pub not_good: Color,
    /// Rows highlighted as scope added.
    pub added: Color,
    /// Rows highlighted as scope removed.
    pub removed: Color,
    /// Rows highlighted as committed but unfinished.
    pub unfinished: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            good: Color::Green,
            not_good: Color::Red,
            added: Color::Yellow,
            removed: Color::Magenta,
            unfinished: Color::LightRed,
            border: Color::Gray,
            header: Style::new().fg(Color::Cyan).bold(),
            selected: Style::new().bg(Color::DarkGray).bold(),
            tab_active: Style::new().fg(Color::Cyan).bold(),
            tab_inactive: Style::new().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            good: Color::Green,
            not_good: Color::Red,
            added: Color::Rgb(176, 120, 0),
            removed: Color::Magenta,
            unfinished: Color::Rgb(200, 60, 40),
            border: Color::DarkGray,
            header: Style::new().fg(Color::Blue).bold(),
            selected: Style::new().bg(Color::LightBlue).bold(),
            tab_active: Style::new().fg(Color::Blue).bold(),
            tab_inactive: Style::new().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a sprint health status
    pub fn status_style(&self, status: HealthStatus) -> Style {
        match status {
            HealthStatus::Good => Style::default().fg(self.good),
            HealthStatus::NotGood => Style::new().fg(self.not_good).bold(),
        }
    }

    /// Get style for a highlighted item row
    pub fn highlight_style(&self, highlight: Highlight) -> Style {
        match highlight {
            Highlight::Added => Style::default().fg(self.added),
            Highlight::Removed => Style::default().fg(self.removed),
            Highlight::Unfinished => Style::default().fg(self.unfinished),
        }
    }
}
