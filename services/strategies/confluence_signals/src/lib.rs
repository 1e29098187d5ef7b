//! # Confluence Signals Strategy - Multi-Indicator Directional Signals
//!
//! ## Purpose
//!
//! Turns two candle series for one asset into a directional CALL/PUT signal,
//! or an explicit "no signal", by counting how many independent technical
//! indicators agree. A signal is only emitted when at least three categories
//! confirm the same direction and one side outscores the other.
//!
//! ## Integration Points
//!
//! - **Input**: long-timeframe series (1h, trend and levels) and short-timeframe
//!   series (1m, price action) as [`indicators::CandleSeries`]
//! - **Market Data**: exchange REST klines or saved kline files via [`MarketDataSource`]
//! - **Output**: [`SignalResult`] with per-indicator analyses and diagnostics,
//!   printed as JSON by the `confluence_signals` binary
//! - **Configuration**: TOML file plus `CONFLUENCE__*` environment overrides
//!
//! ## Architecture Role
//!
//! ```text
//! Klines → [IndicatorSnapshot] → [ConfluenceScorer] → [Decision] → SignalResult
//!             ↓                      ↓                   ↓
//!       RSI, MACD, BB,         rule table per       min confluences,
//!       EMA trend, S/R,        category + volume    confidence 50-95,
//!       Fibonacci, patterns    bonus                0-5 star level
//! ```
//!
//! ## Scoring Categories
//!
//! | Category | Strong | Weak |
//! |---|---|---|
//! | RSI | 25 | 8 |
//! | MACD | 25 | 10 |
//! | Bollinger Bands | 20 | - |
//! | Trend | 20 | 10 |
//! | Support/Resistance | 20 | - |
//! | Fibonacci | 15 | - |
//! | Price Action | 20 | 10 |
//!
//! Volume never counts as a confluence; a spike adds 10 points to the side
//! already ahead.
//!
//! ## Example
//!
//! ```rust,no_run
//! use confluence_signals::{AssetSpec, ConfluenceSignalEngine, SignalEngineConfig};
//! use indicators::CandleSeries;
//!
//! # fn run(long: CandleSeries, short: CandleSeries) -> confluence_signals::Result<()> {
//! let engine = ConfluenceSignalEngine::new(SignalEngineConfig::default())?;
//! let result = engine.evaluate(&AssetSpec::new("BTC/USDT", "BTCUSDT"), &long, &short)?;
//! if result.has_signal {
//!     println!("{} {} {}", result.signal_type, result.confidence, result.stars());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod market_data;
pub mod scoring;
pub mod service;
pub mod signals;
pub mod snapshot;
pub mod strategy;

pub use config::{
    ConfigOrigin, DecisionParams, IndicatorParams, MarketDataConfig, ScoringThresholds,
    SignalEngineConfig,
};
pub use error::{Result, StrategyError};
pub use market_data::{BinanceKlineClient, FileKlineSource, MarketDataSource};
pub use scoring::{Category, ConfluenceScorer, Scorecard, Verdict, SCORING_RULES};
pub use service::{select_assets, SignalService};
pub use signals::{AnalysisEntry, AnalysisStatus, AssetSpec, SignalResult, SignalStats, SignalType};
pub use snapshot::IndicatorSnapshot;
pub use strategy::{ConfluenceSignalEngine, Decision};
