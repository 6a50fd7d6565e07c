//! Display formatting shared by the viewer and the report sinks.

use sprintwatch_types::WindowKpis;

/// Points render the same everywhere: `5`, `2.5`, never `2.50`.
pub use sprintwatch_core::normalize::format_points;

/// Render a ratio as a percentage with two decimals, e.g. `0.4` as `40.00%`.
pub fn format_pct(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Render a KPI value according to its kind.
pub fn format_kpi(name: &str, value: f64) -> String {
    if WindowKpis::is_ratio(name) {
        format_pct(value)
    } else {
        format!("{:.2}", value)
    }
}

/// Arrow shown next to the sorted column.
pub fn sort_arrow(ascending: bool) -> &'static str {
    if ascending {
        "↑"
    } else {
        "↓"
    }
}
