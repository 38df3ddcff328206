pub mod settings;

pub use settings::{EngineSettings, IndicatorParams, LogFormat, LogSettings};
