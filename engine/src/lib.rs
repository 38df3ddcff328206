// Engine library root
// Indicator core (indicators, analysis, signals) plus the collaborators
// that feed it and the service the binary drives.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod positions;
pub mod services;
pub mod signals;

pub use analysis::{calculate_all_indicators, calculate_all_indicators_with};
pub use error::EngineError;
pub use signals::generate_trade_signal;
