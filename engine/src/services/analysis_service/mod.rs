// engine/src/services/analysis_service/mod.rs
// AnalysisService owns the loaded rate histories and the indicator periods;
// each operation lives in its own submodule.

use crate::config::{EngineSettings, IndicatorParams};
use crate::data::rate_history::{RateHistoryProvider, RateHistoryStore};
use crate::error::EngineError;

pub mod analyze;
pub mod calculate_indicator;

pub use analyze::AnalysisReport;
pub use calculate_indicator::IndicatorReading;

pub struct AnalysisService {
    store: RateHistoryStore,
    params: IndicatorParams,
}

impl AnalysisService {
    pub fn new(params: IndicatorParams) -> Self {
        AnalysisService {
            store: RateHistoryStore::new(),
            params,
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.indicators.clone())
    }

    pub fn store(&self) -> &RateHistoryStore {
        &self.store
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Pulls the provider's history into the store under `pair`. Returns the
    /// number of new observations.
    pub fn load_history(&mut self, pair: &str, provider: &dyn RateHistoryProvider) -> Result<usize, EngineError> {
        tracing::info!(pair = %pair, source = %provider.describe(), "Loading rate history");
        let rates = provider.historical_rates()?;
        if rates.is_empty() {
            return Err(EngineError::RateHistoryError(format!(
                "{} contains no rates for {}",
                provider.describe(),
                pair
            )));
        }
        let added = self.store.add_rates(pair, rates)?;
        tracing::info!(pair = %pair, added, "Rate history loaded");
        Ok(added)
    }

    fn prices_for(&self, pair: &str) -> Result<Vec<f64>, EngineError> {
        match self.store.prices(pair) {
            Some(prices) if !prices.is_empty() => Ok(prices),
            _ => {
                tracing::warn!(pair = %pair, "No rate history loaded");
                Err(EngineError::RateHistoryError(format!("No rate history loaded for '{}'", pair)))
            }
        }
    }
}
