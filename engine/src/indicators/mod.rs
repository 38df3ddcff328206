// Technical indicators module
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod support_resistance;
pub mod trend;
pub mod volatility;

pub use ema::{calculate_ema, Ema};
pub use macd::{calculate_macd, calculate_macd_incremental, calculate_macd_with};
pub use rsi::{calculate_rsi, Rsi};
pub use sma::{calculate_sma, Sma};
pub use support_resistance::{
    calculate_support_resistance, calculate_support_resistance_with, SupportResistance,
};
pub use trend::{classify_trend, determine_trend};
pub use volatility::{calculate_volatility, Volatility};

use serde_json::Value;

/// Largest lookback accepted from user input (settings or indicator parameters).
pub const MAX_PERIOD: usize = 10_000;

// Common trait for single-value indicators evaluated at the end of a price series.
// Implementations never fail: short or empty input degrades to a documented fallback.
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, prices: &[f64]) -> f64;
}
