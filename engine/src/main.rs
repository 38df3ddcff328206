// fx-signals command-line entry point
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use engine::config::EngineSettings;
use engine::data::{summarize_portfolio, CsvRateHistory, FrankfurterFile, PortfolioParser, RateHistoryProvider};
use engine::error::EngineError;
use engine::logging::init_logging;
use engine::positions::{pnl, PositionBook};
use engine::services::{AnalysisReport, AnalysisService};
use shared::models::{Position, PositionSide};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fx-signals")]
#[command(about = "Technical indicators and trade signals for FX rate histories", long_about = None)]
struct Cli {
    /// Settings file (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the indicator snapshot and trade signal for a rate history
    Analyze {
        /// Rate history: `date,rate` CSV or a saved Frankfurter time-series JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Currency pair label (defaults to the configured pair)
        #[arg(short, long)]
        pair: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a single indicator at the end of a rate history
    Indicator {
        #[arg(short, long)]
        input: PathBuf,

        /// Indicator kind (sma, ema, rsi, volatility)
        #[arg(short, long)]
        kind: String,

        /// Indicator parameters as JSON, e.g. '{"period": 10}'
        #[arg(long, default_value = "")]
        params: String,

        #[arg(short, long)]
        pair: Option<String>,
    },

    /// Import a tab-separated holdings file and print its summary
    Portfolio {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Maintain the position book
    Position {
        #[command(subcommand)]
        action: PositionAction,
    },
}

#[derive(Subcommand)]
enum PositionAction {
    /// Open a new position
    Open {
        #[arg(long, value_enum)]
        side: Side,

        /// Entry rate
        #[arg(long)]
        entry: f64,

        /// Size in standard lots
        #[arg(long, default_value = "0.1")]
        lots: f64,
    },
    /// Close an open position at the given rate
    Close {
        id: String,

        #[arg(long)]
        rate: f64,
    },
    /// Delete a position from the book
    Remove { id: String },
    /// List positions with P&L at the given rate
    List {
        #[arg(long)]
        rate: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Buy,
    Sell,
}

impl From<Side> for PositionSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => PositionSide::Buy,
            Side::Sell => PositionSide::Sell,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match EngineSettings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };
    init_logging(&settings.log);

    match run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            let code = e.downcast_ref::<EngineError>().map_or(1, EngineError::exit_code);
            ExitCode::from(code as u8)
        }
    }
}

fn run(command: Commands, settings: &EngineSettings) -> Result<()> {
    match command {
        Commands::Analyze { input, pair, json } => {
            let pair = pair.unwrap_or_else(|| settings.pair.clone());
            let service = load_service(settings, &pair, &input)?;
            let report = service.analyze(&pair)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Indicator { input, kind, params, pair } => {
            let pair = pair.unwrap_or_else(|| settings.pair.clone());
            let service = load_service(settings, &pair, &input)?;
            let reading = service.calculate_indicator(&pair, &kind, &params)?;
            println!("{} {} = {:.4}", reading.pair, reading.indicator_name, reading.value);
        }
        Commands::Portfolio { input } => {
            let holdings = PortfolioParser::load_holdings(&input)?;
            if let Some(summary) = summarize_portfolio(&holdings) {
                println!("Holdings:    {}", summary.holdings);
                println!("Total value: {:.2}", summary.total_value);
                println!(
                    "Top gainer:  {} ({:+.2}%)",
                    summary.top_gainer.symbol, summary.top_gainer.change_percent
                );
                println!(
                    "Top loser:   {} ({:+.2}%)",
                    summary.top_loser.symbol, summary.top_loser.change_percent
                );
            }
        }
        Commands::Position { action } => run_position(action, &settings.positions_file)?,
    }
    Ok(())
}

fn run_position(action: PositionAction, book_path: &Path) -> Result<()> {
    let mut book = PositionBook::load(book_path)
        .with_context(|| format!("Failed to load position book '{}'", book_path.display()))?;

    match action {
        PositionAction::Open { side, entry, lots } => {
            let position = book.open(side.into(), entry, lots)?;
            println!("Opened {}", position.id);
        }
        PositionAction::Close { id, rate } => {
            let position = book.close(&id, rate)?;
            print_position(position, rate);
        }
        PositionAction::Remove { id } => {
            let position = book.remove(&id)?;
            println!("Removed {}", position.id);
        }
        PositionAction::List { rate } => {
            if book.is_empty() {
                println!("No positions");
            }
            for position in book.open_positions().chain(book.closed_positions()) {
                print_position(position, rate);
            }
            return Ok(());
        }
    }

    book.save(book_path)
        .with_context(|| format!("Failed to save position book '{}'", book_path.display()))?;
    Ok(())
}

fn load_service(settings: &EngineSettings, pair: &str, input: &Path) -> Result<AnalysisService> {
    let provider = provider_for(input, pair);
    let mut service = AnalysisService::from_settings(settings);
    service.load_history(pair, provider.as_ref())?;
    Ok(service)
}

// Frankfurter payloads are keyed by the quote currency, e.g. CLP for USD/CLP
fn provider_for(input: &Path, pair: &str) -> Box<dyn RateHistoryProvider> {
    let is_json = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let currency = pair.rsplit('/').next().unwrap_or(pair);
        Box::new(FrankfurterFile::new(input, currency))
    } else {
        Box::new(CsvRateHistory::new(input))
    }
}

fn print_report(report: &AnalysisReport) {
    let quote = &report.quote;
    let snapshot = &report.snapshot;
    println!("{} {:.2} ({:+.2}, {:+.2}%)", report.pair, quote.rate, quote.change, quote.change_percent);
    println!("  range      {:.2} - {:.2}", quote.low, quote.high);
    println!("  RSI        {:.1}", snapshot.rsi);
    println!("  SMA 20/50  {:.2} / {:.2}", snapshot.sma20, snapshot.sma50);
    println!("  EMA 12/26  {:.2} / {:.2}", snapshot.ema12, snapshot.ema26);
    println!(
        "  MACD       {:.4} signal {:.4} hist {:.4}",
        snapshot.macd.macd, snapshot.macd.signal, snapshot.macd.histogram
    );
    println!("  S/R        {:.2} / {:.2}", snapshot.support, snapshot.resistance);
    println!("  volatility {:.3}%", snapshot.volatility);
    println!("  trend      {}", snapshot.trend);
    println!(
        "Signal: {} ({} confidence, {} bullish / {} bearish)",
        report.signal.direction, report.signal.confidence, report.scorecard.bullish, report.scorecard.bearish
    );
    println!("  {}", report.signal.reasoning);
}

fn print_position(position: &Position, rate: f64) {
    let pnl = pnl(position, rate);
    println!(
        "{} {:?} {:.2} lots @ {:.2} [{:?}] P&L {:+.2} USD / {:+.0} CLP",
        position.id, position.direction, position.lot_size, position.entry_price, position.status, pnl.usd, pnl.clp
    );
}
