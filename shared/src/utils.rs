// Numeric helpers shared by the engine and any presentation layer.

/// Rounds to a fixed number of decimal places, the way quote fields are reported.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Arithmetic mean, 0 for an empty slice.
///
/// When the plain sum overflows, the terms are pre-divided by twice the
/// count and the half-mean doubled back, saturating at `f64::MAX`. Any slice
/// of finite values has a finite mean.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        return sum / count;
    }
    let half_mean: f64 = values.iter().map(|v| v / (2.0 * count)).sum();
    saturate(half_mean * 2.0)
}

/// Clamps an overflowed result to the largest finite value of the same sign.
pub fn saturate(value: f64) -> f64 {
    value.clamp(f64::MIN, f64::MAX)
}

/// Last element of a series, or `default` when empty.
pub fn last_or(values: &[f64], default: f64) -> f64 {
    values.last().copied().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(912.3456, 2), 912.35);
        assert_eq!(round_to(-2.504, 2), -2.5);
    }

    #[test]
    fn test_last_or() {
        assert_eq!(last_or(&[1.0, 2.0], 0.0), 2.0);
        assert_eq!(last_or(&[], 850.0), 850.0);
    }

    #[test]
    fn test_mean_matches_plain_average() {
        assert_eq!(mean(&[10.0, 20.0, 30.0, 40.0, 50.0]), 30.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_of_huge_values_stays_finite() {
        let m = mean(&[f64::MAX, f64::MAX, f64::MAX]);
        assert!(m.is_finite());
        assert!((m / f64::MAX - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(f64::INFINITY), f64::MAX);
        assert_eq!(saturate(f64::NEG_INFINITY), f64::MIN);
        assert_eq!(saturate(-3.5), -3.5);
    }
}
