// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::utils::mean;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Neutral reading reported when there are not enough price changes.
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI at the end of the series using Wilder smoothing.
///
/// The first `period` price changes seed the average gain and loss as simple
/// means; every later change updates them as
/// `avg = (avg * (period - 1) + current) / period`, with the side that did not
/// move receiving a zero. Fewer than `period + 1` prices yields [`NEUTRAL_RSI`].
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() <= period {
        return NEUTRAL_RSI;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    // Initial averages are simple means over the first `period` changes
    let (gains, losses): (Vec<f64>, Vec<f64>) = changes[..period]
        .iter()
        .map(|&change| if change > 0.0 { (change, 0.0) } else { (0.0, change.abs()) })
        .unzip();
    let mut avg_gain = mean(&gains);
    let mut avg_loss = mean(&losses);

    for &change in &changes[period..] {
        let (current_gain, current_loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, change.abs())
        };
        avg_gain = wilder_step(avg_gain, current_gain, period);
        avg_loss = wilder_step(avg_loss, current_loss, period);
    }

    if avg_loss == 0.0 {
        return 100.0; // Avoid division by zero; if no losses, RSI is 100
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

// `(avg * (period - 1) + current) / period`, rewritten as an increment when
// the product overflows. Both inputs are non-negative, so the increment is finite.
fn wilder_step(average: f64, current: f64, period: usize) -> f64 {
    let period = period as f64;
    let next = (average * (period - 1.0) + current) / period;
    if next.is_finite() {
        next
    } else {
        average + (current - average) / period
    }
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, prices: &[f64]) -> f64 {
        calculate_rsi(prices, self.period)
    }
}
