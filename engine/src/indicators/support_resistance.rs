//! Support and resistance levels from trailing-window extrema

use shared::utils::{last_or, saturate};

pub const DEFAULT_LOOKBACK: usize = 30;
pub const DEFAULT_MIN_HISTORY: usize = 20;
pub const DEFAULT_BAND_PCT: f64 = 0.02;

/// Reference price used when the series is empty.
pub const DEFAULT_REFERENCE_PRICE: f64 = 850.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

/// Support/resistance with the default 30-point lookback and ±2% fallback band.
pub fn calculate_support_resistance(prices: &[f64]) -> SupportResistance {
    calculate_support_resistance_with(
        prices,
        DEFAULT_LOOKBACK,
        DEFAULT_MIN_HISTORY,
        DEFAULT_BAND_PCT,
        DEFAULT_REFERENCE_PRICE,
    )
}

/// Lowest and highest price over the trailing `lookback` points.
///
/// Below `min_history` points the levels are a symmetric band of `band_pct`
/// around the latest price (or `reference_price` when there is none).
pub fn calculate_support_resistance_with(
    prices: &[f64],
    lookback: usize,
    min_history: usize,
    band_pct: f64,
    reference_price: f64,
) -> SupportResistance {
    if prices.len() < min_history || prices.is_empty() || lookback == 0 {
        let current_price = last_or(prices, reference_price);
        return SupportResistance {
            support: current_price * (1.0 - band_pct),
            resistance: saturate(current_price * (1.0 + band_pct)),
        };
    }

    let window = &prices[prices.len().saturating_sub(lookback)..];
    let support = window.iter().copied().fold(f64::INFINITY, f64::min);
    let resistance = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SupportResistance {
        support,
        resistance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_history_uses_band() {
        let levels = calculate_support_resistance(&[900.0, 910.0, 1000.0]);
        assert!((levels.support - 980.0).abs() < 1e-9);
        assert!((levels.resistance - 1020.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history_uses_reference_price() {
        let levels = calculate_support_resistance(&[]);
        assert!((levels.support - 833.0).abs() < 1e-9);
        assert!((levels.resistance - 867.0).abs() < 1e-9);
    }

    #[test]
    fn test_between_min_history_and_lookback_uses_all_points() {
        let prices: Vec<f64> = (0..25).map(|i| 900.0 + i as f64).collect();
        let levels = calculate_support_resistance(&prices);
        assert_eq!(levels.support, 900.0);
        assert_eq!(levels.resistance, 924.0);
    }

    #[test]
    fn test_only_trailing_window_counts() {
        let mut prices = vec![500.0, 2000.0];
        prices.extend((0..30).map(|i| 900.0 + (i % 7) as f64));
        let levels = calculate_support_resistance(&prices);
        assert_eq!(levels.support, 900.0);
        assert_eq!(levels.resistance, 906.0);
    }
}
