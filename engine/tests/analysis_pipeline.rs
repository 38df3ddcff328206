// End-to-end checks: files on disk -> providers -> service -> report
use engine::config::EngineSettings;
use engine::data::{CsvRateHistory, FrankfurterFile};
use engine::positions::{pnl, PositionBook};
use engine::services::AnalysisService;
use shared::models::{PositionSide, SignalDirection, Trend};
use std::fmt::Write as _;
use std::fs;
use tempfile::tempdir;

fn history_csv(days: usize, rate_at: impl Fn(f64) -> f64) -> String {
    let mut csv = String::from("date,rate\n");
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for i in 0..days {
        let date = start + chrono::Days::new(i as u64);
        writeln!(csv, "{},{:.2}", date, rate_at(i as f64)).unwrap();
    }
    csv
}

// Accelerating sell-off: momentum keeps getting more negative
fn selloff(i: f64) -> f64 {
    1000.0 - 2.0 * i - 0.05 * i * i
}

#[test]
fn analyze_csv_history_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("usdclp.csv");
    fs::write(&path, history_csv(60, selloff)).unwrap();

    let settings = EngineSettings::default();
    let mut service = AnalysisService::from_settings(&settings);
    let loaded = service.load_history(&settings.pair, &CsvRateHistory::new(&path)).unwrap();
    assert_eq!(loaded, 60);

    let report = service.analyze(&settings.pair).unwrap();
    assert_eq!(report.quote.rate, 707.95);
    assert!((report.quote.change - -7.85).abs() < 1e-9);
    assert_eq!(report.snapshot.trend, Trend::Bearish);
    assert!(report.snapshot.macd.histogram < 0.0);
    assert!(report.snapshot.is_finite());
    assert!(report.scorecard.bearish > report.scorecard.bullish);
    assert_ne!(report.signal.direction, SignalDirection::Buy);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["snapshot"]["trend"], "bearish");
    assert!(json["signal"]["direction"].is_string());
}

#[test]
fn frankfurter_and_csv_sources_agree() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("rates.csv");
    let json_path = dir.path().join("rates.json");
    fs::write(&csv_path, "date,rate\n2024-03-01,951.37\n2024-03-04,949.80\n2024-03-05,955.20\n").unwrap();
    fs::write(
        &json_path,
        r#"{"base":"USD","rates":{"2024-03-05":{"CLP":955.2},"2024-03-01":{"CLP":951.37},"2024-03-04":{"CLP":949.8}}}"#,
    )
    .unwrap();

    let mut from_csv = AnalysisService::from_settings(&EngineSettings::default());
    from_csv.load_history("USD/CLP", &CsvRateHistory::new(&csv_path)).unwrap();
    let mut from_json = AnalysisService::from_settings(&EngineSettings::default());
    from_json.load_history("USD/CLP", &FrankfurterFile::new(&json_path, "CLP")).unwrap();

    let a = from_csv.analyze("USD/CLP").unwrap();
    let b = from_json.analyze("USD/CLP").unwrap();
    assert_eq!(a.snapshot, b.snapshot);
    assert_eq!(a.signal, b.signal);
}

#[test]
fn settings_file_changes_indicator_periods() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("settings.json");
    fs::write(&config, r#"{"pair":"USD/CLP","indicators":{"sma_short_period":5}}"#).unwrap();
    let settings = EngineSettings::load(Some(config.as_path())).unwrap();

    let csv = dir.path().join("rates.csv");
    fs::write(&csv, history_csv(30, |i| 1000.0 - 2.0 * i)).unwrap();
    let mut service = AnalysisService::from_settings(&settings);
    service.load_history("USD/CLP", &CsvRateHistory::new(&csv)).unwrap();

    let report = service.analyze("USD/CLP").unwrap();
    // Last five rates: 950, 948, 946, 944, 942
    assert!((report.snapshot.sma20 - 946.0).abs() < 1e-9);
}

#[test]
fn position_book_round_trip_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("positions.json");

    let mut book = PositionBook::load(&path).unwrap();
    let id = book.open(PositionSide::Buy, 950.0, 0.1).unwrap().id.clone();
    book.save(&path).unwrap();

    let mut book = PositionBook::load(&path).unwrap();
    let closed = book.close(&id, 960.0).unwrap().clone();
    book.save(&path).unwrap();
    let profit = pnl(&closed, 900.0);
    assert!((profit.clp - 100_000.0).abs() < 1e-6);

    let mut book = PositionBook::load(&path).unwrap();
    book.remove(&id).unwrap();
    book.save(&path).unwrap();
    assert!(!path.exists());
}
