//! Signal synthesis from indicator snapshots.

pub mod rules;
pub mod synthesizer;

pub use rules::{Bias, ScoringRule, SignalContext, Vote, SCORING_RULES};
pub use synthesizer::{decide, generate_trade_signal, score_snapshot, signal_from_scorecard, Scorecard};
