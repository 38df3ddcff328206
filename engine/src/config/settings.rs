// Engine settings, loaded from a JSON file or defaulted
use crate::error::EngineError;
use crate::indicators::{macd, rsi, support_resistance, MAX_PERIOD};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub pair: String,
    pub log: LogSettings,
    pub indicators: IndicatorParams,
    pub positions_file: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            pair: "USD/CLP".to_string(),
            log: LogSettings::default(),
            indicators: IndicatorParams::default(),
            positions_file: PathBuf::from("positions.json"),
        }
    }
}

impl EngineSettings {
    /// Reads settings from `path`, or returns the defaults when no path is given.
    /// Keys missing from the file keep their default values.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let settings = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), pair = %settings.pair, "Loaded engine settings");
        Ok(settings)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(raw)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.pair.trim().is_empty() {
            return Err(EngineError::ConfigError("pair must not be empty".to_string()));
        }
        self.indicators.validate()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Periods and windows for the indicator aggregator.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub sma_short_period: usize,
    pub sma_long_period: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub macd_signal_period: usize,
    pub support_resistance_lookback: usize,
    pub support_resistance_min_history: usize,
    pub fallback_band_pct: f64,
    pub reference_price: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            rsi_period: rsi::DEFAULT_RSI_PERIOD,
            sma_short_period: 20,
            sma_long_period: 50,
            ema_fast_period: macd::DEFAULT_FAST_PERIOD,
            ema_slow_period: macd::DEFAULT_SLOW_PERIOD,
            macd_signal_period: macd::DEFAULT_SIGNAL_PERIOD,
            support_resistance_lookback: support_resistance::DEFAULT_LOOKBACK,
            support_resistance_min_history: support_resistance::DEFAULT_MIN_HISTORY,
            fallback_band_pct: support_resistance::DEFAULT_BAND_PCT,
            reference_price: support_resistance::DEFAULT_REFERENCE_PRICE,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), EngineError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("sma_short_period", self.sma_short_period),
            ("sma_long_period", self.sma_long_period),
            ("ema_fast_period", self.ema_fast_period),
            ("ema_slow_period", self.ema_slow_period),
            ("macd_signal_period", self.macd_signal_period),
            ("support_resistance_lookback", self.support_resistance_lookback),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, value)| *value == 0) {
            return Err(EngineError::ConfigError(format!("{} must be greater than 0", name)));
        }
        let min_history = ("support_resistance_min_history", self.support_resistance_min_history);
        if let Some((name, value)) = periods
            .iter()
            .chain([&min_history])
            .find(|(_, value)| *value > MAX_PERIOD)
        {
            return Err(EngineError::ConfigError(format!(
                "{} must be at most {}, got {}",
                name, MAX_PERIOD, value
            )));
        }
        if !(0.0..1.0).contains(&self.fallback_band_pct) {
            return Err(EngineError::ConfigError(format!(
                "fallback_band_pct must be in [0, 1), got {}",
                self.fallback_band_pct
            )));
        }
        if !self.reference_price.is_finite() || self.reference_price <= 0.0 {
            return Err(EngineError::ConfigError(format!(
                "reference_price must be a positive number, got {}",
                self.reference_price
            )));
        }
        Ok(())
    }
}
