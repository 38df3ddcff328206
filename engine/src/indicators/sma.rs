// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::utils::{last_or, mean};

/// Mean of the last `period` prices.
///
/// With fewer than `period` prices (or a zero period) the latest price is
/// returned instead, or 0 for an empty series.
pub fn calculate_sma(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return last_or(prices, 0.0);
    }

    mean(&prices[prices.len() - period..])
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, prices: &[f64]) -> f64 {
        calculate_sma(prices, self.period)
    }
}
