//! Property-based tests for the indicator core and signal synthesis.

use engine::indicators::{
    calculate_macd, calculate_macd_incremental, calculate_rsi, calculate_sma,
    calculate_support_resistance,
};
use engine::{calculate_all_indicators, generate_trade_signal};
use proptest::prelude::*;
use shared::models::{Confidence, SignalDirection};

// ============================================================================
// Strategies
// ============================================================================

/// A positive, finite FX-style rate.
fn valid_rate() -> impl Strategy<Value = f64> {
    (0.01f64..10_000.0).prop_filter("must be finite", |x| x.is_finite())
}

/// Any positive finite value, weighted towards the extremes of the f64 range.
fn extreme_rate() -> impl Strategy<Value = f64> {
    prop_oneof![
        f64::MIN_POSITIVE..f64::MAX,
        1.0e300f64..f64::MAX,
        1.0e-300f64..1.0e-100,
        0.01f64..10_000.0,
    ]
}

fn rate_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(valid_rate(), min_len..=max_len)
}

/// A random walk around a start rate, closer to real FX histories than
/// independent draws.
fn random_walk(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (
        500.0f64..1500.0,
        prop::collection::vec(-0.02f64..0.02, min_len..=max_len),
    )
        .prop_map(|(start, steps)| {
            steps
                .into_iter()
                .scan(start, |rate, step| {
                    *rate *= 1.0 + step;
                    Some(*rate)
                })
                .collect()
        })
}

// ============================================================================
// Indicator properties
// ============================================================================

proptest! {
    /// Every snapshot field is finite for any positive series, including
    /// the short-history fallbacks.
    #[test]
    fn snapshot_always_finite(prices in rate_series(0, 80)) {
        let snapshot = calculate_all_indicators(&prices);
        prop_assert!(snapshot.is_finite(), "non-finite snapshot: {:?}", snapshot);
    }

    /// Same guarantee across the whole positive finite range, where plain
    /// sums and differences would overflow.
    #[test]
    fn snapshot_finite_for_extreme_rates(prices in prop::collection::vec(extreme_rate(), 0..80)) {
        let snapshot = calculate_all_indicators(&prices);
        prop_assert!(snapshot.is_finite(), "non-finite snapshot: {:?}", snapshot);
        if let Some(&price) = prices.last() {
            let signal = generate_trade_signal(&snapshot, price);
            prop_assert!(!signal.reasoning.is_empty());
        }
    }

    #[test]
    fn rsi_within_bounds(prices in rate_series(0, 60), period in 1usize..=20) {
        let rsi = calculate_rsi(&prices, period);
        prop_assert!((0.0..=100.0).contains(&rsi), "RSI out of range: {}", rsi);
    }

    #[test]
    fn rsi_neutral_on_short_history(prices in rate_series(0, 14)) {
        prop_assert_eq!(calculate_rsi(&prices, 14), 50.0);
    }

    #[test]
    fn histogram_is_macd_minus_signal(prices in random_walk(26, 90)) {
        let macd = calculate_macd(&prices);
        prop_assert!((macd.histogram - (macd.macd - macd.signal)).abs() < 1e-9);
    }

    #[test]
    fn incremental_macd_matches_prefix(prices in random_walk(0, 90)) {
        let prefix = calculate_macd(&prices);
        let incremental = calculate_macd_incremental(&prices, 12, 26, 9);
        prop_assert!((prefix.macd - incremental.macd).abs() <= 1e-9 * prefix.macd.abs().max(1.0));
        prop_assert!((prefix.signal - incremental.signal).abs() <= 1e-9 * prefix.signal.abs().max(1.0));
        prop_assert!((prefix.histogram - incremental.histogram).abs() <= 1e-9 * prefix.histogram.abs().max(1.0));
    }

    #[test]
    fn sma_of_constant_is_constant(rate in valid_rate(), len in 1usize..60, period in 1usize..30) {
        let prices = vec![rate; len];
        prop_assert!((calculate_sma(&prices, period) - rate).abs() < 1e-9 * rate.max(1.0));
    }

    /// Support never exceeds resistance, whatever the history length.
    #[test]
    fn support_not_above_resistance(prices in rate_series(0, 60)) {
        let levels = calculate_support_resistance(&prices);
        prop_assert!(levels.support <= levels.resistance);
    }
}

// ============================================================================
// Aggregator and signal properties
// ============================================================================

proptest! {
    #[test]
    fn aggregator_is_idempotent(prices in random_walk(0, 80)) {
        prop_assert_eq!(calculate_all_indicators(&prices), calculate_all_indicators(&prices));
    }

    #[test]
    fn signal_is_deterministic_and_consistent(prices in random_walk(1, 80)) {
        let snapshot = calculate_all_indicators(&prices);
        let price = prices[prices.len() - 1];
        let first = generate_trade_signal(&snapshot, price);
        let second = generate_trade_signal(&snapshot, price);
        prop_assert_eq!(&first, &second);
        prop_assert!(!first.reasoning.is_empty());
        // HOLD is only ever reported with low confidence
        if first.direction == SignalDirection::Hold {
            prop_assert_eq!(first.confidence, Confidence::Low);
        } else {
            prop_assert_ne!(first.confidence, Confidence::Low);
        }
    }
}
