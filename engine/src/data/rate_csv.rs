// CSV rate-history loader
use super::rate_history::RateHistoryProvider;
use crate::error::EngineError;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use shared::models::HistoricalRate;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

// CSV Header: date,rate
// Example Row: 2024-03-01,951.37
#[derive(Debug, Deserialize)]
struct RateRecord {
    date: NaiveDate,
    rate: f64,
}

pub struct RateCsvParser;

impl RateCsvParser {
    pub fn load_rates_from_csv(file_path: &Path) -> Result<Vec<HistoricalRate>, EngineError> {
        let file = File::open(file_path)?;
        let rates = Self::parse_rates(BufReader::new(file))?;
        tracing::info!(path = %file_path.display(), count = rates.len(), "Loaded rate history from CSV");
        Ok(rates)
    }

    /// Parses `date,rate` rows and returns them sorted by date.
    pub fn parse_rates<R: Read>(reader: R) -> Result<Vec<HistoricalRate>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rates = Vec::new();
        for (idx, result) in rdr.deserialize::<RateRecord>().enumerate() {
            let record = result?;
            if !record.rate.is_finite() || record.rate <= 0.0 {
                return Err(EngineError::CsvDataFormatError(format!(
                    "Invalid rate {} for {} at line {}",
                    record.rate,
                    record.date,
                    idx + 2
                )));
            }
            rates.push(HistoricalRate::new(record.date, record.rate));
        }

        rates.sort_by_key(|r| r.date);
        Ok(rates)
    }
}

/// A rate history stored as a `date,rate` CSV file.
pub struct CsvRateHistory {
    path: PathBuf,
}

impl CsvRateHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RateHistoryProvider for CsvRateHistory {
    fn historical_rates(&self) -> Result<Vec<HistoricalRate>, EngineError> {
        RateCsvParser::load_rates_from_csv(&self.path)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}
