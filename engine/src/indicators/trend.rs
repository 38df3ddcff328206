// Trend classification from price against its moving averages
use shared::models::Trend;

/// Bullish when the latest price is above both averages and the short average
/// leads; bearish for the mirror image; neutral otherwise, including an empty series.
pub fn determine_trend(prices: &[f64], sma20: f64, sma50: f64) -> Trend {
    match prices.last() {
        Some(&price) => classify_trend(price, sma20, sma50),
        None => Trend::Neutral,
    }
}

pub fn classify_trend(price: f64, sma20: f64, sma50: f64) -> Trend {
    if price > sma20 && price > sma50 && sma20 > sma50 {
        Trend::Bullish
    } else if price < sma20 && price < sma50 && sma20 < sma50 {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}
