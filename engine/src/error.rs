use thiserror::Error;

/// Errors raised by the collaborators around the indicator core: settings,
/// rate-history and portfolio loading, and the position book. Indicator and
/// signal computations never fail.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Rate history error: {0}")]
    RateHistoryError(String),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),

    #[error("Position error: {0}")]
    PositionError(String),

    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    // Catch-all for anyhow errors when direct conversion is suitable
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// Process exit code reported by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::ConfigError(_) => 78,
            EngineError::CsvSystemError { .. }
            | EngineError::CsvDataFormatError(_)
            | EngineError::SerializationError { .. } => 65,
            EngineError::IoError { .. } => 74,
            EngineError::RateHistoryError(_)
            | EngineError::IndicatorError(_)
            | EngineError::PositionError(_) => 64,
            EngineError::AnyhowError(_) => 70,
        }
    }
}
