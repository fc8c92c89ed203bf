//! Ratio normalization against the mean of a trace's leading samples.
//!
//! This is the ΔF/F-style divisor applied by the pipeline. The per-cell
//! integration offset lives on [`Cell::baseline`](crate::signal::Cell) and is
//! unrelated.
use crate::signal::Sample;

/// Mean of the first `min(samples, values.len())` values.
///
/// Falls back to 1 when the window is empty or its mean is zero so callers
/// can always divide by the result.
pub fn baseline_value(values: &[f64], samples: usize) -> f64 {
    let limit = samples.min(values.len());
    if limit == 0 {
        return 1.0;
    }
    let mean = values[..limit].iter().sum::<f64>() / limit as f64;
    if mean == 0.0 {
        1.0
    } else {
        mean
    }
}

/// Divide every value of `series` by the baseline of its first `samples`
/// values. Times are unchanged.
pub fn normalize(series: &[Sample], samples: usize) -> Vec<Sample> {
    let values: Vec<f64> = series.iter().map(|s| s.value).collect();
    let denominator = baseline_value(&values, samples);
    series
        .iter()
        .map(|s| Sample::new(s.time, s.value / denominator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::series_from_pairs;

    #[test]
    fn baseline_uses_leading_window() {
        let values = [2.0, 4.0, 100.0, 100.0];
        assert_eq!(baseline_value(&values, 2), 3.0);
    }

    #[test]
    fn window_longer_than_series_is_capped() {
        let values = [2.0, 4.0];
        assert_eq!(baseline_value(&values, 30), 3.0);
    }

    #[test]
    fn degenerate_windows_fall_back_to_one() {
        assert_eq!(baseline_value(&[], 5), 1.0);
        assert_eq!(baseline_value(&[4.0, 2.0], 0), 1.0);
        assert_eq!(baseline_value(&[0.0, 0.0, 3.0], 2), 1.0);
    }

    #[test]
    fn normalize_rescales_values_only() {
        let series = series_from_pairs(&[[0.0, 2.0], [1.0, 2.0], [2.0, 6.0]]);
        let out = normalize(&series, 2);
        assert_eq!(out, series_from_pairs(&[[0.0, 1.0], [1.0, 1.0], [2.0, 3.0]]));
    }

    #[test]
    fn normalize_empty_series() {
        assert!(normalize(&[], 10).is_empty());
    }
}
