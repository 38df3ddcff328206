//! Indicator aggregator: one price series in, one [`IndicatorSnapshot`] out.

use crate::config::IndicatorParams;
use crate::indicators::{
    calculate_ema, calculate_macd_with, calculate_rsi, calculate_sma,
    calculate_support_resistance_with, calculate_volatility, determine_trend,
};
use shared::models::IndicatorSnapshot;
use std::borrow::Cow;

/// Computes every indicator with the standard periods (RSI 14, SMA 20/50,
/// EMA 12/26, MACD 12/26/9, 30-point support/resistance).
pub fn calculate_all_indicators(prices: &[f64]) -> IndicatorSnapshot {
    calculate_all_indicators_with(prices, &IndicatorParams::default())
}

/// Computes every indicator with the given periods.
///
/// NaN and infinite observations are dropped before any computation, so each
/// field of the result is finite. Each component applies its own short-history
/// fallback; nothing here can fail.
pub fn calculate_all_indicators_with(prices: &[f64], params: &IndicatorParams) -> IndicatorSnapshot {
    let prices = finite_prices(prices);
    let prices = prices.as_ref();

    let sma20 = calculate_sma(prices, params.sma_short_period);
    let sma50 = calculate_sma(prices, params.sma_long_period);
    let levels = calculate_support_resistance_with(
        prices,
        params.support_resistance_lookback,
        params.support_resistance_min_history,
        params.fallback_band_pct,
        params.reference_price,
    );

    let snapshot = IndicatorSnapshot {
        rsi: calculate_rsi(prices, params.rsi_period),
        sma20,
        sma50,
        ema12: calculate_ema(prices, params.ema_fast_period),
        ema26: calculate_ema(prices, params.ema_slow_period),
        macd: calculate_macd_with(
            prices,
            params.ema_fast_period,
            params.ema_slow_period,
            params.macd_signal_period,
        ),
        support: levels.support,
        resistance: levels.resistance,
        volatility: calculate_volatility(prices),
        trend: determine_trend(prices, sma20, sma50),
    };

    tracing::trace!(
        observations = prices.len(),
        rsi = snapshot.rsi,
        trend = %snapshot.trend,
        "Computed indicator snapshot"
    );
    snapshot
}

fn finite_prices(prices: &[f64]) -> Cow<'_, [f64]> {
    if prices.iter().all(|p| p.is_finite()) {
        return Cow::Borrowed(prices);
    }
    let kept: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
    tracing::warn!(
        dropped = prices.len() - kept.len(),
        kept = kept.len(),
        "Dropped non-finite price observations"
    );
    Cow::Owned(kept)
}
