// Single-indicator evaluation over a loaded pair
use super::AnalysisService;
use crate::error::EngineError;
use crate::indicators::{Ema, IndicatorCalculator, Rsi, Sma, Volatility, MAX_PERIOD};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorReading {
    pub pair: String,
    pub indicator_name: String,
    pub parameters: Value,
    pub value: f64,
}

impl AnalysisService {
    /// Evaluates one indicator kind (`sma`, `ema`, `rsi`, `volatility`) at the
    /// end of the pair's history. `parameters` is a JSON object such as
    /// `{"period": 10}`; an empty string uses the defaults.
    pub fn calculate_indicator(
        &self,
        pair: &str,
        indicator_type: &str,
        parameters: &str,
    ) -> Result<IndicatorReading, EngineError> {
        tracing::debug!(pair = %pair, indicator_type = %indicator_type, "Calculating indicator");
        let prices = self.prices_for(pair)?;

        let params: Value = if parameters.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(parameters).map_err(|e| {
                tracing::error!(
                    indicator_type = %indicator_type,
                    parameters = %parameters,
                    error_detail = ?e,
                    "Invalid JSON parameters for indicator"
                );
                EngineError::IndicatorError(format!(
                    "Invalid JSON parameters for indicator '{}': {}",
                    indicator_type, e
                ))
            })?
        };

        let calculator = build_calculator(indicator_type, &params)?;
        let value = calculator.calculate(&prices);

        Ok(IndicatorReading {
            pair: pair.to_string(),
            indicator_name: calculator.name().to_string(),
            parameters: calculator.parameters(),
            value,
        })
    }
}

fn period_param(params: &Value, default: usize) -> Result<usize, EngineError> {
    let period = params.get("period").and_then(Value::as_u64).unwrap_or(default as u64);
    if period == 0 {
        return Err(EngineError::IndicatorError("Indicator period cannot be 0".to_string()));
    }
    if period > MAX_PERIOD as u64 {
        return Err(EngineError::IndicatorError(format!(
            "Indicator period {} exceeds the maximum of {}",
            period, MAX_PERIOD
        )));
    }
    Ok(period as usize)
}

pub fn build_calculator(indicator_type: &str, params: &Value) -> Result<Box<dyn IndicatorCalculator>, EngineError> {
    let calculator: Box<dyn IndicatorCalculator> = match indicator_type.to_lowercase().as_str() {
        "sma" => Box::new(Sma::new(period_param(params, 20)?)),
        "ema" => Box::new(Ema::new(period_param(params, 20)?)),
        "rsi" => Box::new(Rsi::new(period_param(params, crate::indicators::rsi::DEFAULT_RSI_PERIOD)?)),
        "volatility" => Box::new(Volatility),
        _ => {
            tracing::error!(indicator_type = %indicator_type, "Unknown indicator type requested");
            return Err(EngineError::IndicatorError(format!("Unknown indicator type: {}", indicator_type)));
        }
    };
    Ok(calculator)
}
