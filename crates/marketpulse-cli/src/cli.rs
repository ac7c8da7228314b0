//! CLI argument definitions for marketpulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `history` | Fetch OHLCV history with derived indicator columns |
//! | `news` | Fetch prioritized news and the weighted sentiment |
//! | `volume` | Analyze trading volume patterns |
//! | `score` | Blend sentiment/technical/volume/correlation into one score |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--refresh` | `false` | Bypass cached results for this run |
//! | `--offline` | `false` | Use deterministic mock providers |
//! | `--market-suffix` | none | Exchange suffix for bare symbols (e.g. `.SA`) |
//! | `--country` | none | Country filter for the news feed (e.g. `sa`) |
//! | `--cache-ttl-secs` | `300` | TTL for cached fetch results |
//!
//! # Examples
//!
//! ```bash
//! # Indicator table for Aramco over three months
//! marketpulse history 2222 --period 3mo --market-suffix .SA
//!
//! # Prioritized news and weighted sentiment
//! marketpulse news 2222 --limit 50
//!
//! # Full blended score against a peer set
//! marketpulse score 2222 --peers 1120,1180 --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Stock analysis CLI: price indicators, news sentiment, and a blended
/// market score, fetched from public market-data and news providers.
#[derive(Debug, Parser)]
#[command(
    name = "marketpulse",
    author,
    version,
    about = "Price indicators and news sentiment for a stock symbol"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Bypass cached results and fetch fresh data.
    #[arg(long, global = true, default_value_t = false)]
    pub refresh: bool,

    /// Serve deterministic offline data instead of calling providers.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Exchange suffix appended to bare symbols (e.g. `.SA` for Tadawul).
    #[arg(long, global = true)]
    pub market_suffix: Option<String>,

    /// ISO country filter applied to the news feed (e.g. `sa`).
    #[arg(long, global = true)]
    pub country: Option<String>,

    /// Time-to-live for cached fetch results, in seconds.
    #[arg(long, global = true, default_value_t = 300)]
    pub cache_ttl_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch OHLCV history and derived technical indicators.
    History(HistoryArgs),
    /// Fetch prioritized news and the weighted sentiment for a symbol.
    News(NewsArgs),
    /// Analyze trading volume patterns for a symbol.
    Volume(VolumeArgs),
    /// Compute the blended market score for a symbol.
    Score(ScoreArgs),
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Ticker symbol to analyze.
    pub symbol: String,

    /// History window: 1mo, 3mo, 6mo, or 1y.
    #[arg(long, default_value = "3mo")]
    pub period: String,
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    /// Ticker symbol to fetch news for.
    pub symbol: String,

    /// Maximum number of articles to request.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct VolumeArgs {
    /// Ticker symbol to analyze.
    pub symbol: String,

    /// History window: 1mo, 3mo, 6mo, or 1y.
    #[arg(long, default_value = "3mo")]
    pub period: String,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Ticker symbol to score.
    pub symbol: String,

    /// Comma-separated peer symbols used for the beta regression.
    #[arg(long, value_delimiter = ',')]
    pub peers: Vec<String>,

    /// History window: 1mo, 3mo, 6mo, or 1y.
    #[arg(long, default_value = "3mo")]
    pub period: String,

    /// Maximum number of articles to request.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}
