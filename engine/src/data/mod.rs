// Data collaborators: rate history sources, portfolio import
pub mod frankfurter;
pub mod portfolio;
pub mod rate_csv;
pub mod rate_history;

pub use frankfurter::{parse_timeseries, FrankfurterFile};
pub use portfolio::{summarize_portfolio, PortfolioParser, PortfolioSummary};
pub use rate_csv::{CsvRateHistory, RateCsvParser};
pub use rate_history::{summarize_quote, RateHistoryProvider, RateHistoryStore};
