// Full analysis of one pair: quote, indicator snapshot and trade signal
use super::AnalysisService;
use crate::analysis::calculate_all_indicators_with;
use crate::data::rate_history::summarize_quote;
use crate::error::EngineError;
use crate::signals::{score_snapshot, signal_from_scorecard, Scorecard};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::{IndicatorSnapshot, RateQuote, TradeSignal};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub pair: String,
    pub observations: usize,
    pub quote: RateQuote,
    pub snapshot: IndicatorSnapshot,
    pub signal: TradeSignal,
    pub scorecard: Scorecard,
}

impl AnalysisService {
    pub fn analyze(&self, pair: &str) -> Result<AnalysisReport, EngineError> {
        self.analyze_at(pair, Utc::now())
    }

    /// Analyzes `pair` at its latest loaded rate, stamping the quote with
    /// `timestamp`.
    pub fn analyze_at(&self, pair: &str, timestamp: DateTime<Utc>) -> Result<AnalysisReport, EngineError> {
        let prices = self.prices_for(pair)?;
        let history = self.store.get_rates(pair, None, None).unwrap_or_default();
        let current_rate = prices[prices.len() - 1];

        let snapshot = calculate_all_indicators_with(&prices, &self.params);
        let scorecard = score_snapshot(&snapshot, current_rate);
        let signal = signal_from_scorecard(&scorecard);

        tracing::info!(
            pair = %pair,
            observations = prices.len(),
            rate = current_rate,
            direction = %signal.direction,
            confidence = %signal.confidence,
            bullish = scorecard.bullish,
            bearish = scorecard.bearish,
            "Generated trade signal"
        );

        Ok(AnalysisReport {
            pair: pair.to_string(),
            observations: prices.len(),
            quote: summarize_quote(pair, current_rate, &history, timestamp),
            snapshot,
            signal,
            scorecard,
        })
    }
}
