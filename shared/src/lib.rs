pub mod models;
pub mod utils;

// Models shared between the engine library, its binary and any presentation layer.
pub use models::{
    Confidence, HistoricalRate, IndicatorSnapshot, MacdValues, PortfolioHolding, Position,
    PositionSide, PositionStatus, RateQuote, SignalDirection, TradeSignal, Trend,
};
