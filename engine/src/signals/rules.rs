//! Scoring rules for the signal synthesizer.
//!
//! Each rule looks at the snapshot and the current price independently and
//! may cast one weighted vote. Rules are listed in the order their reasons
//! appear in the rationale.

use serde::Serialize;
use shared::models::{IndicatorSnapshot, Trend};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_SUPPORT_ZONE: f64 = 40.0;
pub const RSI_RESISTANCE_ZONE: f64 = 60.0;

/// Histogram magnitude above which MACD momentum is called out in the rationale.
pub const STRONG_MACD_HISTOGRAM: f64 = 1.0;

/// Distance to a support/resistance level, in percent of price, that counts as "near".
pub const LEVEL_PROXIMITY_PCT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vote {
    pub bias: Bias,
    pub weight: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Vote {
    fn bullish(weight: u32) -> Self {
        Self {
            bias: Bias::Bullish,
            weight,
            reason: None,
        }
    }

    fn bearish(weight: u32) -> Self {
        Self {
            bias: Bias::Bearish,
            weight,
            reason: None,
        }
    }

    fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// What the rules are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    pub snapshot: &'a IndicatorSnapshot,
    pub price: f64,
}

pub struct ScoringRule {
    pub name: &'static str,
    pub evaluate: fn(&SignalContext<'_>) -> Option<Vote>,
}

pub const SCORING_RULES: [ScoringRule; 7] = [
    ScoringRule {
        name: "rsi_zone",
        evaluate: rsi_zone,
    },
    ScoringRule {
        name: "price_vs_averages",
        evaluate: price_vs_averages,
    },
    ScoringRule {
        name: "average_crossover",
        evaluate: average_crossover,
    },
    ScoringRule {
        name: "macd_momentum",
        evaluate: macd_momentum,
    },
    ScoringRule {
        name: "support_proximity",
        evaluate: support_proximity,
    },
    ScoringRule {
        name: "resistance_proximity",
        evaluate: resistance_proximity,
    },
    ScoringRule {
        name: "trend_alignment",
        evaluate: trend_alignment,
    },
];

fn rsi_zone(ctx: &SignalContext<'_>) -> Option<Vote> {
    let rsi = ctx.snapshot.rsi;
    if rsi < RSI_OVERSOLD {
        Some(Vote::bullish(2).because(format!("RSI at {:.1} suggests oversold condition", rsi)))
    } else if rsi > RSI_OVERBOUGHT {
        Some(Vote::bearish(2).because(format!("RSI at {:.1} indicates overbought condition", rsi)))
    } else if rsi < RSI_SUPPORT_ZONE {
        Some(Vote::bullish(1).because(format!("RSI at {:.1} shows potential support", rsi)))
    } else if rsi > RSI_RESISTANCE_ZONE {
        Some(Vote::bearish(1).because(format!("RSI at {:.1} shows potential resistance", rsi)))
    } else {
        None
    }
}

fn price_vs_averages(ctx: &SignalContext<'_>) -> Option<Vote> {
    let SignalContext { snapshot, price } = *ctx;
    if price > snapshot.sma20 && price > snapshot.sma50 {
        Some(Vote::bullish(2).because("Price above both SMA20 and SMA50 (bullish trend)"))
    } else if price < snapshot.sma20 && price < snapshot.sma50 {
        Some(Vote::bearish(2).because("Price below both SMA20 and SMA50 (bearish trend)"))
    } else {
        None
    }
}

fn average_crossover(ctx: &SignalContext<'_>) -> Option<Vote> {
    if ctx.snapshot.sma20 > ctx.snapshot.sma50 {
        Some(Vote::bullish(1))
    } else {
        Some(Vote::bearish(1))
    }
}

fn macd_momentum(ctx: &SignalContext<'_>) -> Option<Vote> {
    let histogram = ctx.snapshot.macd.histogram;
    if histogram > 0.0 {
        let vote = Vote::bullish(1);
        if histogram > STRONG_MACD_HISTOGRAM {
            return Some(vote.because("MACD showing strong bullish momentum"));
        }
        Some(vote)
    } else {
        let vote = Vote::bearish(1);
        if histogram < -STRONG_MACD_HISTOGRAM {
            return Some(vote.because("MACD showing strong bearish momentum"));
        }
        Some(vote)
    }
}

/// `from - to` as a percentage of `price`, or `None` when the price cannot be
/// used as a denominator.
fn distance_pct(from: f64, to: f64, price: f64) -> Option<f64> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    Some((from - to) / price * 100.0)
}

fn support_proximity(ctx: &SignalContext<'_>) -> Option<Vote> {
    let support = ctx.snapshot.support;
    let to_support = distance_pct(ctx.price, support, ctx.price)?;
    (to_support < LEVEL_PROXIMITY_PCT)
        .then(|| Vote::bullish(2).because(format!("Price near support level at {:.2}", support)))
}

fn resistance_proximity(ctx: &SignalContext<'_>) -> Option<Vote> {
    let resistance = ctx.snapshot.resistance;
    let to_resistance = distance_pct(resistance, ctx.price, ctx.price)?;
    (to_resistance < LEVEL_PROXIMITY_PCT).then(|| {
        Vote::bearish(2).because(format!("Price near resistance level at {:.2}", resistance))
    })
}

fn trend_alignment(ctx: &SignalContext<'_>) -> Option<Vote> {
    match ctx.snapshot.trend {
        Trend::Bullish => Some(Vote::bullish(1)),
        Trend::Bearish => Some(Vote::bearish(1)),
        Trend::Neutral => None,
    }
}
