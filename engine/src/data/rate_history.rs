// Rate-history collaborators: the provider seam, an in-memory store and the daily quote summary
use crate::error::EngineError;
use chrono::{DateTime, NaiveDate, Utc};
use shared::models::{HistoricalRate, RateQuote};
use shared::utils::round_to;
use std::collections::HashMap;

/// Number of trailing observations used for the quote's high/low.
pub const QUOTE_RANGE_DAYS: usize = 5;

/// Band applied around the rate when there is no history to measure against.
pub const QUOTE_FALLBACK_BAND_PCT: f64 = 0.005;

/// Anything that can supply an ordered rate history for one pair.
pub trait RateHistoryProvider {
    /// Rates sorted by date, oldest first.
    fn historical_rates(&self) -> Result<Vec<HistoricalRate>, EngineError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

pub struct RateHistoryStore {
    // Rates per currency pair, kept sorted by date without duplicates
    data: HashMap<String, Vec<HistoricalRate>>,
}

impl RateHistoryStore {
    pub fn new() -> Self {
        RateHistoryStore {
            data: HashMap::new(),
        }
    }

    /// Merges `new_rates` into the pair's history. When a date is already
    /// present the stored observation is kept.
    pub fn add_rates(&mut self, pair: &str, new_rates: Vec<HistoricalRate>) -> Result<usize, EngineError> {
        if let Some(bad) = new_rates.iter().find(|r| !r.rate.is_finite() || r.rate <= 0.0) {
            return Err(EngineError::RateHistoryError(format!(
                "Rejected rate {} on {} for {}: rates must be positive",
                bad.rate, bad.date, pair
            )));
        }

        let history = self.data.entry(pair.to_string()).or_default();
        let before = history.len();
        history.extend(new_rates);
        history.sort_by_key(|r| r.date);
        history.dedup_by_key(|r| r.date);

        let added = history.len() - before;
        tracing::debug!(pair = %pair, added, total = history.len(), "Merged rate history");
        Ok(added)
    }

    pub fn get_rates(
        &self,
        pair: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Option<Vec<HistoricalRate>> {
        self.data.get(pair).map(|rates| {
            rates
                .iter()
                .filter(|r| from_date.map_or(true, |start| r.date >= start))
                .filter(|r| to_date.map_or(true, |end| r.date <= end))
                .cloned()
                .collect()
        })
    }

    /// The pair's rates as a bare price series, oldest first.
    pub fn prices(&self, pair: &str) -> Option<Vec<f64>> {
        self.data.get(pair).map(|rates| rates.iter().map(|r| r.rate).collect())
    }

    pub fn latest(&self, pair: &str) -> Option<&HistoricalRate> {
        self.data.get(pair).and_then(|rates| rates.last())
    }

    pub fn pairs(&self) -> Vec<&str> {
        let mut pairs: Vec<&str> = self.data.keys().map(String::as_str).collect();
        pairs.sort_unstable();
        pairs
    }
}

impl Default for RateHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the quote for `current_rate` from the history that precedes and
/// includes it.
///
/// The change is measured against the second-to-last observation; high and
/// low span the last five observations plus the current rate. Every figure is
/// rounded to two decimals. With fewer than two observations the change is
/// zero and high/low are a ±0.5% band around the rate.
pub fn summarize_quote(
    pair: &str,
    current_rate: f64,
    history: &[HistoricalRate],
    timestamp: DateTime<Utc>,
) -> RateQuote {
    if history.len() < 2 {
        return RateQuote {
            pair: pair.to_string(),
            rate: current_rate,
            change: 0.0,
            change_percent: 0.0,
            high: current_rate * (1.0 + QUOTE_FALLBACK_BAND_PCT),
            low: current_rate * (1.0 - QUOTE_FALLBACK_BAND_PCT),
            timestamp,
        };
    }

    let previous = match history[history.len() - 2].rate {
        rate if rate != 0.0 && rate.is_finite() => rate,
        _ => current_rate,
    };
    let change = current_rate - previous;
    let change_percent = if previous != 0.0 { change / previous * 100.0 } else { 0.0 };

    let recent = &history[history.len().saturating_sub(QUOTE_RANGE_DAYS)..];
    let (low, high) = recent
        .iter()
        .map(|r| r.rate)
        .fold((current_rate, current_rate), |(lo, hi), rate| (lo.min(rate), hi.max(rate)));

    RateQuote {
        pair: pair.to_string(),
        rate: current_rate,
        change: round_to(change, 2),
        change_percent: round_to(change_percent, 2),
        high: round_to(high, 2),
        low: round_to(low, 2),
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn rates(values: &[(u32, f64)]) -> Vec<HistoricalRate> {
        values.iter().map(|&(d, r)| HistoricalRate::new(day(d), r)).collect()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_add_rates_sorts_and_dedups() {
        let mut store = RateHistoryStore::new();
        store.add_rates("USD/CLP", rates(&[(3, 950.0), (1, 940.0)])).unwrap();
        let added = store.add_rates("USD/CLP", rates(&[(2, 945.0), (3, 999.0)])).unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.prices("USD/CLP").unwrap(), vec![940.0, 945.0, 950.0]);
        assert_eq!(store.latest("USD/CLP").unwrap().date, day(3));
    }

    #[test]
    fn test_add_rates_rejects_non_positive() {
        let mut store = RateHistoryStore::new();
        let result = store.add_rates("USD/CLP", rates(&[(1, 0.0)]));
        assert!(matches!(result, Err(EngineError::RateHistoryError(_))));
        assert!(store.prices("USD/CLP").is_none());
    }

    #[test]
    fn test_get_rates_by_date_range() {
        let mut store = RateHistoryStore::new();
        store
            .add_rates("USD/CLP", rates(&[(1, 940.0), (2, 945.0), (3, 950.0), (4, 955.0)]))
            .unwrap();
        let slice = store.get_rates("USD/CLP", Some(day(2)), Some(day(3))).unwrap();
        assert_eq!(slice.len(), 2);
        assert!(store.get_rates("EUR/CLP", None, None).is_none());
        assert_eq!(store.pairs(), vec!["USD/CLP"]);
    }

    #[test]
    fn test_quote_without_history_uses_band() {
        let quote = summarize_quote("USD/CLP", 1000.0, &rates(&[(1, 1000.0)]), noon());
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_percent, 0.0);
        assert!((quote.high - 1005.0).abs() < 1e-9);
        assert!((quote.low - 995.0).abs() < 1e-9);
    }

    #[test]
    fn test_quote_change_and_range() {
        let history = rates(&[(1, 930.0), (2, 960.0), (3, 941.0), (4, 944.0), (5, 948.0), (6, 950.0), (7, 955.0)]);
        let quote = summarize_quote("USD/CLP", 955.0, &history, noon());
        assert_eq!(quote.change, 5.0);
        assert_eq!(quote.change_percent, round_to(5.0 / 950.0 * 100.0, 2));
        // 930 and 960 fall outside the last five observations
        assert_eq!(quote.high, 955.0);
        assert_eq!(quote.low, 941.0);
        assert_eq!(quote.timestamp, noon());
    }

    #[test]
    fn test_quote_zero_previous_rate_uses_current() {
        let history = rates(&[(1, 0.0), (2, 900.0)]);
        let quote = summarize_quote("USD/CLP", 900.0, &history, noon());
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_percent, 0.0);
        assert_eq!(quote.low, 0.0);
    }
}
