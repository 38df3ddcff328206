//! Turns an indicator snapshot into a BUY/SELL/HOLD recommendation.

use super::rules::{Bias, SignalContext, Vote, SCORING_RULES};
use serde::Serialize;
use shared::models::{Confidence, IndicatorSnapshot, SignalDirection, TradeSignal};

/// Score difference at or beyond which a recommendation is made with high confidence.
pub const HIGH_CONFIDENCE_DIFF: i64 = 5;
/// Score difference at or beyond which a directional recommendation is made at all.
pub const MEDIUM_CONFIDENCE_DIFF: i64 = 3;

/// Number of reasons quoted in the rationale.
pub const MAX_REASONS: usize = 3;

pub const MIXED_SIGNALS_REASONING: &str =
    "Indicators show mixed signals. Market conditions are unclear.";

/// Tally of every vote cast by the scoring rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    pub bullish: u32,
    pub bearish: u32,
    pub reasons: Vec<String>,
}

impl Scorecard {
    fn record(mut self, vote: Vote) -> Self {
        match vote.bias {
            Bias::Bullish => self.bullish += vote.weight,
            Bias::Bearish => self.bearish += vote.weight,
        }
        if let Some(reason) = vote.reason {
            self.reasons.push(reason);
        }
        self
    }

    pub fn diff(&self) -> i64 {
        i64::from(self.bullish) - i64::from(self.bearish)
    }
}

/// Runs every scoring rule against the snapshot and folds the votes.
pub fn score_snapshot(snapshot: &IndicatorSnapshot, current_price: f64) -> Scorecard {
    let ctx = SignalContext {
        snapshot,
        price: current_price,
    };
    SCORING_RULES
        .iter()
        .filter_map(|rule| (rule.evaluate)(&ctx))
        .fold(Scorecard::default(), Scorecard::record)
}

/// Maps a bullish-minus-bearish score difference to a direction and confidence.
pub fn decide(diff: i64) -> (SignalDirection, Confidence) {
    match diff {
        d if d >= HIGH_CONFIDENCE_DIFF => (SignalDirection::Buy, Confidence::High),
        d if d >= MEDIUM_CONFIDENCE_DIFF => (SignalDirection::Buy, Confidence::Medium),
        d if d <= -HIGH_CONFIDENCE_DIFF => (SignalDirection::Sell, Confidence::High),
        d if d <= -MEDIUM_CONFIDENCE_DIFF => (SignalDirection::Sell, Confidence::Medium),
        _ => (SignalDirection::Hold, Confidence::Low),
    }
}

fn reasoning(reasons: &[String]) -> String {
    if reasons.is_empty() {
        return MIXED_SIGNALS_REASONING.to_string();
    }
    let quoted: Vec<&str> = reasons.iter().take(MAX_REASONS).map(String::as_str).collect();
    format!("{}.", quoted.join(". "))
}

pub fn generate_trade_signal(snapshot: &IndicatorSnapshot, current_price: f64) -> TradeSignal {
    signal_from_scorecard(&score_snapshot(snapshot, current_price))
}

/// Direction, confidence and rationale for an already computed scorecard.
pub fn signal_from_scorecard(scorecard: &Scorecard) -> TradeSignal {
    let (direction, confidence) = decide(scorecard.diff());

    TradeSignal {
        direction,
        confidence,
        reasoning: reasoning(&scorecard.reasons),
    }
}
