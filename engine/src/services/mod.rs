// Application services built on the indicator core and data collaborators
pub mod analysis_service;

pub use analysis_service::{AnalysisReport, AnalysisService, IndicatorReading};
