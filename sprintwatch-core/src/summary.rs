//! Window-wide KPI summary.

use sprintwatch_types::{SprintMetrics, WindowKpis};

use crate::aggregate::ratio;

/// Summarize a window of sprint metrics.
///
/// Variance and standard deviation use the sample (n-1) denominator and are
/// zero for fewer than two sprints. The standard deviation is the square root
/// of the reported variance, so the two always agree.
pub fn summarize(metrics: &[SprintMetrics]) -> WindowKpis {
    let accepted: Vec<f64> = metrics.iter().map(|m| m.accepted_pts).collect();

    let avg_accepted = mean(&accepted);
    let variance_accepted = sample_variance(&accepted);
    let std_dev_accepted = variance_accepted.sqrt();

    // 1 - coefficient of variation; negative when spread exceeds the mean.
    let predictability = if avg_accepted == 0.0 {
        0.0
    } else {
        1.0 - std_dev_accepted / avg_accepted
    };

    let scope_pts: f64 = metrics.iter().map(|m| m.scope_change_pts()).sum();
    let committed_pts: f64 = metrics.iter().map(|m| m.committed_pts).sum();

    let committed: Vec<f64> = metrics.iter().map(|m| m.committed_pts).collect();
    let scope_changes: Vec<f64> = metrics.iter().map(|m| m.scope_change).collect();

    WindowKpis {
        avg_accepted,
        std_dev_accepted,
        predictability,
        volatility: ratio(scope_pts, committed_pts),
        avg_committed: mean(&committed),
        avg_scope_change: mean(&scope_changes),
        variance_accepted,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let squares: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    squares / (values.len() - 1) as f64
}
