// Exponential Moving Average (EMA) indicator implementation
use super::sma::calculate_sma;
use super::IndicatorCalculator;
use serde_json::Value;
use shared::utils::last_or;

pub(crate) fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// One step of the EMA recurrence.
///
/// If the difference form overflows (operands of opposite sign near the f64
/// limits) the equivalent weighted sum is used, which stays finite.
pub(crate) fn ema_step(price: f64, previous: f64, multiplier: f64) -> f64 {
    let next = (price - previous) * multiplier + previous;
    if next.is_finite() {
        next
    } else {
        price * multiplier + previous * (1.0 - multiplier)
    }
}

/// EMA at the end of the series, seeded with the SMA of the first `period` prices.
///
/// Short history (or a zero period) degrades to the latest price, like [`calculate_sma`].
pub fn calculate_ema(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return last_or(prices, 0.0);
    }

    let multiplier = ema_multiplier(period);
    let seed = calculate_sma(&prices[..period], period);

    prices[period..]
        .iter()
        .fold(seed, |previous, &price| ema_step(price, previous, multiplier))
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, prices: &[f64]) -> f64 {
        calculate_ema(prices, self.period)
    }
}
