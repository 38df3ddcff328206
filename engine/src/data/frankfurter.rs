//! Offline reader for Frankfurter time-series payloads.
//!
//! A saved response of `GET /{start}..{end}?from=USD&to=CLP` looks like
//! `{"base":"USD","start_date":"…","end_date":"…","rates":{"2024-03-01":{"CLP":951.37}}}`.

use super::rate_history::RateHistoryProvider;
use crate::error::EngineError;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::HistoricalRate;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    base: Option<String>,
    rates: BTreeMap<String, HashMap<String, f64>>,
}

/// Extracts the `currency` series, oldest first. Days without a positive
/// quote for that currency are skipped.
pub fn parse_timeseries(json: &str, currency: &str) -> Result<Vec<HistoricalRate>, EngineError> {
    let response: TimeSeriesResponse = serde_json::from_str(json)?;

    let mut rates = Vec::with_capacity(response.rates.len());
    for (date_str, quotes) in &response.rates {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            EngineError::RateHistoryError(format!("Invalid date '{}' in time series: {}", date_str, e))
        })?;
        match quotes.get(currency) {
            Some(&rate) if rate.is_finite() && rate > 0.0 => rates.push(HistoricalRate::new(date, rate)),
            _ => tracing::debug!(date = %date, currency, "No usable quote for day, skipping"),
        }
    }

    rates.sort_by_key(|r| r.date);
    tracing::debug!(
        base = response.base.as_deref().unwrap_or("?"),
        currency,
        count = rates.len(),
        "Parsed Frankfurter time series"
    );
    Ok(rates)
}

/// A Frankfurter time-series response saved to disk.
pub struct FrankfurterFile {
    path: PathBuf,
    currency: String,
}

impl FrankfurterFile {
    pub fn new(path: impl Into<PathBuf>, currency: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            currency: currency.into(),
        }
    }
}

impl RateHistoryProvider for FrankfurterFile {
    fn historical_rates(&self) -> Result<Vec<HistoricalRate>, EngineError> {
        let raw = fs::read_to_string(&self.path)?;
        parse_timeseries(&raw, &self.currency)
    }

    fn describe(&self) -> String {
        format!("frankfurter:{}[{}]", self.path.display(), self.currency)
    }
}
