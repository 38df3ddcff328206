//! Volatility as the dispersion of period-over-period returns

use super::IndicatorCalculator;
use serde_json::Value;
use shared::utils::{mean, saturate};

/// Standard deviation of simple returns across the whole series, in percent.
///
/// Returns 0 with fewer than two prices. Returns measured from a zero price
/// are skipped. The variance divides by the number of returns. Extreme
/// returns are rescaled before squaring and the result saturates at
/// `f64::MAX`, so it is always finite.
pub fn calculate_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = prices
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|r| r.is_finite())
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let average = mean(&returns);
    let deviations: Vec<f64> = returns.iter().map(|r| r - average).collect();
    let squares: Vec<f64> = deviations.iter().map(|d| d.powi(2)).collect();

    let std_dev = if squares.iter().all(|s| s.is_finite()) {
        mean(&squares).sqrt()
    } else {
        let scale = deviations.iter().fold(0.0_f64, |max, d| max.max(d.abs()));
        let scaled: Vec<f64> = deviations.iter().map(|d| (d / scale).powi(2)).collect();
        scale * mean(&scaled).sqrt()
    };

    saturate(std_dev * 100.0)
}

#[derive(Debug, Default)]
pub struct Volatility;

impl IndicatorCalculator for Volatility {
    fn name(&self) -> &str {
        "Volatility"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({})
    }

    fn calculate(&self, prices: &[f64]) -> f64 {
        calculate_volatility(prices)
    }
}
