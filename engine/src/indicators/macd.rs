//! MACD (Moving Average Convergence Divergence) indicator
//!
//! MACD = EMA(fast) - EMA(slow)
//! Signal = EMA(signal) of the historical MACD line
//! Histogram = MACD - Signal

use super::ema::{calculate_ema, ema_multiplier, ema_step};
use super::sma::calculate_sma;
use shared::models::MacdValues;
use shared::utils::saturate;

pub const DEFAULT_FAST_PERIOD: usize = 12;
pub const DEFAULT_SLOW_PERIOD: usize = 26;
pub const DEFAULT_SIGNAL_PERIOD: usize = 9;

/// MACD with the default 12/26/9 periods.
pub fn calculate_macd(prices: &[f64]) -> MacdValues {
    calculate_macd_with(prices, DEFAULT_FAST_PERIOD, DEFAULT_SLOW_PERIOD, DEFAULT_SIGNAL_PERIOD)
}

/// MACD whose signal line is built by recomputing both EMAs on every prefix.
///
/// For each prefix length from `slow_period` to the full length the fast and
/// slow EMAs are evaluated from scratch and their difference appended to the
/// historical MACD line. This is O(n²) in the series length. Fewer than
/// `slow_period` prices yields all zeros.
pub fn calculate_macd_with(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdValues {
    if slow_period == 0 || prices.len() < slow_period {
        return MacdValues::default();
    }

    let macd_line = calculate_ema(prices, fast_period) - calculate_ema(prices, slow_period);

    let macd_values: Vec<f64> = (slow_period..=prices.len())
        .map(|end| {
            let prefix = &prices[..end];
            calculate_ema(prefix, fast_period) - calculate_ema(prefix, slow_period)
        })
        .collect();

    let signal_line = calculate_ema(&macd_values, signal_period);

    MacdValues {
        macd: macd_line,
        signal: signal_line,
        histogram: saturate(macd_line - signal_line),
    }
}

/// Single-pass equivalent of [`calculate_macd_with`].
///
/// Each prefix EMA equals the running EMA at that index, so carrying both
/// recurrences forward reproduces the same additions in the same order.
pub fn calculate_macd_incremental(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdValues {
    if slow_period == 0 || prices.len() < slow_period {
        return MacdValues::default();
    }

    let mut fast = RunningEma::new(fast_period);
    let mut slow = RunningEma::new(slow_period);
    let mut macd_values = Vec::with_capacity(prices.len() + 1 - slow_period);

    for end in 1..=prices.len() {
        let prefix = &prices[..end];
        let fast_value = fast.advance(prefix);
        let slow_value = slow.advance(prefix);
        if end >= slow_period {
            macd_values.push(fast_value - slow_value);
        }
    }

    let macd_line = macd_values.last().copied().unwrap_or_default();
    let signal_line = calculate_ema(&macd_values, signal_period);

    MacdValues {
        macd: macd_line,
        signal: signal_line,
        histogram: saturate(macd_line - signal_line),
    }
}

/// EMA carried forward one price at a time, with the same short-history
/// fallback as [`calculate_ema`].
struct RunningEma {
    period: usize,
    multiplier: f64,
    value: Option<f64>,
}

impl RunningEma {
    fn new(period: usize) -> Self {
        Self {
            period,
            multiplier: ema_multiplier(period),
            value: None,
        }
    }

    /// Returns the EMA of `prefix`, whose last element is the newly observed price.
    fn advance(&mut self, prefix: &[f64]) -> f64 {
        let price = prefix[prefix.len() - 1];
        let next = match self.value {
            Some(previous) => ema_step(price, previous, self.multiplier),
            None if self.period > 0 && prefix.len() == self.period => {
                calculate_sma(prefix, self.period)
            }
            None => return price,
        };
        self.value = Some(next);
        next
    }
}
