use crate::{section::Section, signal::Sample};

/// Trapezoidal area of `value - baseline` over time, counting only the part
/// above `baseline`.
///
/// The result is in value·time units and is never negative. Fewer than two
/// samples give 0. Callers restrict `series` to the window of interest first,
/// see [`samples_in_section`].
pub fn integrate_samples(series: &[Sample], baseline: f64) -> f64 {
    let excess = |s: &Sample| (s.value - baseline).max(0.0);
    series
        .windows(2)
        .map(|w| (w[1].time - w[0].time) * ((excess(&w[0]) + excess(&w[1])) / 2.0))
        .fold(0.0, |acc, a| acc + a)
}

/// The samples of `series` whose time lies in `[section.start, section.end]`.
pub fn samples_in_section(series: &[Sample], section: &Section) -> Vec<Sample> {
    series
        .iter()
        .filter(|s| section.contains(s.time))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::series_from_pairs;

    #[test]
    fn triangle_above_baseline() {
        let data = series_from_pairs(&[[0.0, 1.0], [1.0, 3.0], [2.0, 1.0]]);
        assert_eq!(integrate_samples(&data, 1.0), 2.0);
    }

    #[test]
    fn excursions_below_baseline_count_as_zero() {
        let data = series_from_pairs(&[[0.0, -4.0], [1.0, 2.0], [2.0, -4.0]]);
        // excess is [0, 1, 0]
        assert_eq!(integrate_samples(&data, 1.0), 1.0);
        let below = series_from_pairs(&[[0.0, 0.2], [1.0, 0.9], [2.0, 1.0]]);
        assert_eq!(integrate_samples(&below, 1.0), 0.0);
    }

    #[test]
    fn uneven_spacing() {
        let data = series_from_pairs(&[[0.0, 2.0], [0.5, 2.0], [2.5, 4.0]]);
        // 0.5 * 1 + 2.0 * (1 + 3) / 2
        assert_eq!(integrate_samples(&data, 1.0), 4.5);
    }

    #[test]
    fn short_series_have_no_area() {
        assert_eq!(integrate_samples(&[], 0.0), 0.0);
        assert_eq!(integrate_samples(&[Sample::new(1.0, 50.0)], 0.0), 0.0);
    }

    #[test]
    fn area_is_non_negative() {
        let data: Vec<Sample> = (0..100)
            .map(|i| Sample::new(i as f64 * 1.1, (i as f64 * 0.21).cos() * 3.0))
            .collect();
        for baseline in [-5.0, -1.0, 0.0, 0.5, 2.0, 10.0] {
            assert!(integrate_samples(&data, baseline) >= 0.0);
        }
        assert_eq!(integrate_samples(&data, 10.0), 0.0);
    }

    #[test]
    fn section_window_is_inclusive() {
        let data = series_from_pairs(&[[0.0, 1.0], [1.1, 2.0], [2.2, 3.0], [3.3, 4.0]]);
        let section = Section::new("mid", 1.1, 2.2).unwrap();
        assert_eq!(
            samples_in_section(&data, &section),
            series_from_pairs(&[[1.1, 2.0], [2.2, 3.0]])
        );
    }
}
