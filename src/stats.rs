//! Small numeric helpers shared across the metrics, score, and threshold
//! components: mean, median, stdev, clamp, a tanh sigmoid, and percentile.

/// Arithmetic mean. Empty input yields 0.0.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// True median (not the `(max-min)/2` shortcut some implementations use).
pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation. Empty or singleton input yields 0.0.
pub fn stdev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let variance = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    variance.sqrt()
}

/// Clamp `x` into `[lo, hi]`.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// tanh-based sigmoid, used to turn an unbounded deviation into a bounded
/// adjustment in `[-1, 1]` before scaling.
pub fn sigmoid(sensitivity: f64, x: f64) -> f64 {
    (sensitivity * x).tanh()
}

/// Nearest-rank percentile of `xs` at `p` in `[0, 1]`. Empty input yields 0.0.
pub fn percentile(xs: &[f64], p: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let p = clamp(p, 0.0, 1.0);
    let rank = (p * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn median_matches_true_definition_not_range_midpoint() {
        // (max - min) / 2 for [1, 2, 100] would give 49.5; true median is 2.
        assert_eq!(median(&[1.0, 2.0, 100.0]), 2.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn stdev_of_constant_series_is_zero() {
        assert_eq!(stdev(&[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn clamp_bounds_values() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn sigmoid_is_bounded_and_zero_at_origin() {
        assert_eq!(sigmoid(3.0, 0.0), 0.0);
        assert!(sigmoid(3.0, 10.0) < 1.0);
        assert!(sigmoid(3.0, -10.0) > -1.0);
    }

    #[test]
    fn percentile_matches_known_values() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&xs, 0.0), 1.0);
        assert_eq!(percentile(&xs, 1.0), 5.0);
    }
}
