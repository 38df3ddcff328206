// Brokerage holdings import (tab-separated) and summary
use crate::error::EngineError;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use shared::models::PortfolioHolding;
use std::fs;
use std::path::Path;

const MIN_COLUMNS: usize = 5;

pub struct PortfolioParser;

impl PortfolioParser {
    pub fn load_holdings(file_path: &Path) -> Result<Vec<PortfolioHolding>, EngineError> {
        let content = fs::read(file_path)?;
        let holdings = Self::parse_holdings_bytes(&content)?;
        tracing::info!(path = %file_path.display(), count = holdings.len(), "Imported portfolio holdings");
        Ok(holdings)
    }

    // Header: Symbol<TAB>Price<TAB>Change<TAB>Change %<TAB>Shares
    // Example Row: AAPL<TAB>189.30<TAB>-1.20<TAB>-0.63%<TAB>15
    //
    // Rows that cannot be decoded, have missing columns or unparseable numbers
    // are skipped with a warning; the import only fails when nothing usable remains.
    pub fn parse_holdings(content: &str) -> Result<Vec<PortfolioHolding>, EngineError> {
        Self::parse_holdings_bytes(content.as_bytes())
    }

    pub fn parse_holdings_bytes(content: &[u8]) -> Result<Vec<PortfolioHolding>, EngineError> {
        if String::from_utf8_lossy(content).trim().lines().count() < 2 {
            return Err(EngineError::CsvDataFormatError(
                "CSV file must contain a header row and at least one data row".to_string(),
            ));
        }

        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content);

        let mut holdings = Vec::new();
        for result in rdr.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    tracing::warn!(line, error = %e, "Skipping holding row: unreadable record");
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());

            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            if record.len() < MIN_COLUMNS {
                tracing::warn!(line, columns = record.len(), "Skipping holding row: insufficient columns");
                continue;
            }

            match Self::parse_record(&record) {
                Some(holding) => holdings.push(holding),
                None => tracing::warn!(line, "Skipping holding row: invalid number format"),
            }
        }

        if holdings.is_empty() {
            return Err(EngineError::CsvDataFormatError(
                "No valid positions found in CSV file".to_string(),
            ));
        }
        Ok(holdings)
    }

    fn parse_record(record: &StringRecord) -> Option<PortfolioHolding> {
        let number = |idx: usize| -> Option<f64> {
            record
                .get(idx)?
                .trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
        };

        let price = number(1)?;
        let change = number(2)?;
        let change_percent = number(3)?;
        let shares = number(4)?;

        Some(PortfolioHolding {
            symbol: record.get(0)?.to_string(),
            price,
            change,
            change_percent,
            shares,
            market_value: price * shares,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub holdings: usize,
    pub top_gainer: PortfolioHolding,
    pub top_loser: PortfolioHolding,
}

/// Totals and best/worst movers; `None` for an empty portfolio.
/// Ties keep the earliest holding.
pub fn summarize_portfolio(holdings: &[PortfolioHolding]) -> Option<PortfolioSummary> {
    let first = holdings.first()?;

    let top_gainer = holdings
        .iter()
        .fold(first, |best, h| if h.change_percent > best.change_percent { h } else { best });
    let top_loser = holdings
        .iter()
        .fold(first, |worst, h| if h.change_percent < worst.change_percent { h } else { worst });

    Some(PortfolioSummary {
        total_value: holdings.iter().map(|h| h.market_value).sum(),
        holdings: holdings.len(),
        top_gainer: top_gainer.clone(),
        top_loser: top_loser.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Symbol\tPrice\tChange\tChange %\tShares";

    #[test]
    fn test_parse_valid_rows() {
        let content = format!("{HEADER}\nAAPL\t189.30\t-1.20\t-0.63%\t15\nMSFT\t410.00\t5.00\t1.23%\t2\n");
        let holdings = PortfolioParser::parse_holdings(&content).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].symbol, "AAPL");
        assert_eq!(holdings[0].change_percent, -0.63);
        assert!((holdings[0].market_value - 2839.5).abs() < 1e-9);
        assert_eq!(holdings[1].market_value, 820.0);
    }

    #[test]
    fn test_skips_short_and_invalid_rows() {
        let content = format!("{HEADER}\nAAPL\t189.30\t-1.20\nBAD\tx\t1\t1%\t1\n\nNVDA\t900\t10\t1.1%\t1");
        let holdings = PortfolioParser::parse_holdings(&content).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol, "NVDA");
    }

    #[test]
    fn test_undecodable_row_is_skipped() {
        let mut content = format!("{HEADER}\n").into_bytes();
        content.extend_from_slice(b"AB\xff\t1\t1\t1%\t1\n");
        content.extend_from_slice(b"NVDA\t900\t10\t1.1%\t1\n");
        let holdings = PortfolioParser::parse_holdings_bytes(&content).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol, "NVDA");
    }

    #[test]
    fn test_load_holdings_with_bad_bytes_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(format!("{HEADER}\n").as_bytes()).unwrap();
        file.write_all(b"\xfe\xff\t1\t1\t1%\t1\nMSFT\t410\t5\t1.23%\t2\n").unwrap();
        let holdings = PortfolioParser::load_holdings(file.path()).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].market_value, 820.0);
    }

    #[test]
    fn test_header_only_is_error() {
        let err = PortfolioParser::parse_holdings(HEADER).unwrap_err();
        assert!(err.to_string().contains("header row and at least one data row"));
    }

    #[test]
    fn test_no_valid_rows_is_error() {
        let content = format!("{HEADER}\nAAPL\tn/a\t1\t1%\t1");
        let err = PortfolioParser::parse_holdings(&content).unwrap_err();
        assert!(err.to_string().contains("No valid positions found"));
    }

    #[test]
    fn test_summary() {
        let content = format!("{HEADER}\nA\t10\t1\t2%\t10\nB\t20\t-1\t-3%\t5\nC\t5\t0\t2%\t4");
        let holdings = PortfolioParser::parse_holdings(&content).unwrap();
        let summary = summarize_portfolio(&holdings).unwrap();
        assert_eq!(summary.total_value, 220.0);
        assert_eq!(summary.holdings, 3);
        assert_eq!(summary.top_gainer.symbol, "A");
        assert_eq!(summary.top_loser.symbol, "B");
        assert!(summarize_portfolio(&[]).is_none());
    }
}
