//! Trend lines across the sprint window for sparklines.

use sprintwatch_types::SprintMetrics;

const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Normalize values to 0-7 for 8 bar levels, with zero as the floor.
pub fn levels(values: &[f64]) -> Vec<u8> {
    if values.is_empty() {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::MIN, f64::max).max(0.0);
    let min = values.iter().copied().fold(f64::MAX, f64::min).min(0.0);
    let range = max - min;
    if range <= 0.0 {
        return vec![0; values.len()];
    }

    let scale = |v: f64| ((v - min) / range * 7.0).round().clamp(0.0, 7.0) as u8;
    values.iter().map(|&v| scale(v)).collect()
}

/// Render levels as block characters.
pub fn render(levels: &[u8]) -> String {
    let top = SPARKLINE_CHARS.len() - 1;
    levels
        .iter()
        .map(|&v| SPARKLINE_CHARS[usize::from(v).min(top)])
        .collect()
}

/// Accepted points per sprint, in window order.
pub fn accepted_sparkline(metrics: &[SprintMetrics]) -> String {
    let values: Vec<f64> = metrics.iter().map(|m| m.accepted_pts).collect();
    render(&levels(&values))
}

/// Per-sprint predictability, in window order.
pub fn predictability_sparkline(metrics: &[SprintMetrics]) -> String {
    let values: Vec<f64> = metrics.iter().map(|m| m.predictability).collect();
    render(&levels(&values))
}

/// Change in accepted points between the last two sprints of the window.
pub fn accepted_delta(metrics: &[SprintMetrics]) -> Option<f64> {
    let [.., previous, last] = metrics else {
        return None;
    };
    Some(last.accepted_pts - previous.accepted_pts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(accepted: &[f64]) -> Vec<SprintMetrics> {
        accepted
            .iter()
            .enumerate()
            .map(|(i, &a)| SprintMetrics {
                accepted_pts: a,
                ..SprintMetrics::empty(format!("S{}", i + 1))
            })
            .collect()
    }

    #[test]
    fn test_levels_scale_from_zero() {
        assert_eq!(levels(&[0.0, 7.0, 14.0]), [0, 4, 7]);
        assert_eq!(levels(&[10.0, 10.0]), [7, 7]);
    }

    #[test]
    fn test_levels_flat_zero_and_empty() {
        assert_eq!(levels(&[0.0, 0.0, 0.0]), [0, 0, 0]);
        assert!(levels(&[]).is_empty());
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&[0, 3, 7]), "▁▄█");
    }

    #[test]
    fn test_accepted_sparkline() {
        assert_eq!(accepted_sparkline(&metrics(&[0.0, 14.0])), "▁█");
        assert_eq!(accepted_sparkline(&[]), "");
    }

    #[test]
    fn test_accepted_delta() {
        assert_eq!(accepted_delta(&metrics(&[5.0, 8.0, 6.0])), Some(-2.0));
        assert_eq!(accepted_delta(&metrics(&[5.0])), None);
    }
}
