//! Strategy configuration
//!
//! Defaults reproduce the production tuning of the confluence engine. Values
//! are layered: built-in defaults, then an optional TOML file, then
//! `CONFLUENCE__<SECTION>__<FIELD>` environment variables.

use crate::error::{Result, StrategyError};
use crate::signals::AssetSpec;
use anyhow::Context;
use config_crate::{Config, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_PATH_ENV: &str = "CONFLUENCE_SIGNALS_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "configs/confluence_signals.toml";
const ENV_PREFIX: &str = "CONFLUENCE";

/// Fewest bars the price action detector can classify
pub const MIN_SHORT_SERIES_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEngineConfig {
    pub indicators: IndicatorParams,
    pub thresholds: ScoringThresholds,
    pub decision: DecisionParams,
    pub market_data: MarketDataConfig,

    /// Watchlist evaluated by the service binary
    pub assets: Vec<AssetSpec>,

    pub log_level: String,
    pub json_logs: bool,
}

/// Indicator periods applied to the long-timeframe series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_multiplier: Decimal,
    /// Short trend EMA (price vs EMA20)
    pub ema_fast: usize,
    /// Long trend EMA (EMA20 vs EMA50)
    pub ema_slow: usize,
    /// Trailing closes used for the Fibonacci high/low
    pub fib_lookback: usize,
    /// Relative distance under which S/R extrema merge
    pub sr_cluster_threshold: Decimal,
    /// Trailing volumes averaged for the volume ratio
    pub volume_lookback: usize,
}

/// Cut-offs used to classify indicator readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    pub rsi_oversold: Decimal,
    pub rsi_overbought: Decimal,
    pub rsi_neutral_low: Decimal,
    pub rsi_neutral_high: Decimal,
    /// Band position (percent) below which price is at the lower band
    pub bb_lower_zone_pct: Decimal,
    /// Band position (percent) above which price is at the upper band
    pub bb_upper_zone_pct: Decimal,
    /// Relative distance to the nearest S/R level
    pub sr_proximity: Decimal,
    /// Relative distance to an interior Fibonacci level
    pub fib_proximity: Decimal,
    pub volume_spike_ratio: Decimal,
    pub volume_low_ratio: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionParams {
    /// Confirmed categories needed before a direction is emitted
    pub min_confluences: usize,
    pub base_confidence: u8,
    pub max_confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// Exchange REST base URL (klines endpoint is `{base_url}/klines`)
    pub base_url: String,
    pub long_interval: String,
    pub long_limit: usize,
    pub short_interval: String,
    pub short_limit: usize,
    pub request_timeout_secs: u64,
    /// Read `{symbol}_{interval}.json` kline files from here instead of the exchange
    pub data_dir: Option<PathBuf>,
}

impl Default for SignalEngineConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            thresholds: ScoringThresholds::default(),
            decision: DecisionParams::default(),
            market_data: MarketDataConfig::default(),
            assets: vec![
                AssetSpec::new("BTC/USDT", "BTCUSDT"),
                AssetSpec::new("ETH/USDT", "ETHUSDT"),
                AssetSpec::new("SOL/USDT", "SOLUSDT"),
                AssetSpec::new("BNB/USDT", "BNBUSDT"),
                AssetSpec::new("XRP/USDT", "XRPUSDT"),
                AssetSpec::new("ADA/USDT", "ADAUSDT"),
            ],
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: indicators::DEFAULT_RSI_PERIOD,
            macd_fast: indicators::DEFAULT_MACD_FAST,
            macd_slow: indicators::DEFAULT_MACD_SLOW,
            macd_signal: indicators::DEFAULT_MACD_SIGNAL,
            bb_period: indicators::DEFAULT_BB_PERIOD,
            bb_multiplier: indicators::DEFAULT_BB_MULTIPLIER,
            ema_fast: 20,
            ema_slow: 50,
            fib_lookback: 50,
            sr_cluster_threshold: dec!(0.015),
            volume_lookback: 20,
        }
    }
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: dec!(30),
            rsi_overbought: dec!(70),
            rsi_neutral_low: dec!(45),
            rsi_neutral_high: dec!(55),
            bb_lower_zone_pct: dec!(20),
            bb_upper_zone_pct: dec!(80),
            sr_proximity: dec!(0.01),
            fib_proximity: dec!(0.008),
            volume_spike_ratio: dec!(1.5),
            volume_low_ratio: dec!(0.7),
        }
    }
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            min_confluences: 3,
            base_confidence: 50,
            max_confidence: 95,
        }
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com/api/v3".to_string(),
            long_interval: "1h".to_string(),
            long_limit: 100,
            short_interval: "1m".to_string(),
            short_limit: 60,
            request_timeout_secs: 10,
            data_dir: None,
        }
    }
}

impl IndicatorParams {
    /// Shortest long-timeframe series every indicator can be computed from
    pub fn min_long_series_len(&self) -> usize {
        [
            self.rsi_period + 1,
            self.macd_slow,
            self.bb_period,
            self.ema_slow,
            self.fib_lookback,
            self.volume_lookback,
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
    }
}

/// Config file path from `env_var`, falling back to `default`
pub fn resolve_config_path(env_var: &str, default: &str) -> PathBuf {
    std::env::var(env_var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

/// Where the file layer of a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    /// The file was absent and built-in defaults were used
    Defaults { missing: Option<PathBuf> },
}

impl ConfigOrigin {
    /// Report the origin once logging is initialized
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded strategy config: {:?}", path),
            ConfigOrigin::Defaults { missing: Some(path) } => {
                warn!("Strategy config not found: {:?}, using defaults", path)
            }
            ConfigOrigin::Defaults { missing: None } => info!("Using default strategy config"),
        }
    }
}

impl SignalEngineConfig {
    /// Layer defaults, an optional TOML file and environment overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_origin(path).map(|(config, _)| config)
    }

    /// Like [`load`](Self::load), also reporting whether the file was found.
    ///
    /// Nothing is logged here; callers usually load before the subscriber
    /// exists and log the origin afterwards.
    pub fn load_with_origin(path: Option<&Path>) -> anyhow::Result<(Self, ConfigOrigin)> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialize default configuration")?;
        let mut builder = Config::builder().add_source(defaults);

        let origin = match path {
            Some(path) if path.exists() => {
                builder = builder.add_source(File::from(path));
                ConfigOrigin::File(path.to_path_buf())
            }
            Some(path) => ConfigOrigin::Defaults {
                missing: Some(path.to_path_buf()),
            },
            None => ConfigOrigin::Defaults { missing: None },
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok((config, origin))
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let ind = &self.indicators;
        if ind.rsi_period == 0
            || ind.macd_fast == 0
            || ind.macd_signal == 0
            || ind.bb_period == 0
            || ind.ema_fast == 0
            || ind.fib_lookback == 0
            || ind.volume_lookback == 0
        {
            return Err(StrategyError::configuration("indicator periods must be positive"));
        }
        if ind.macd_fast >= ind.macd_slow {
            return Err(StrategyError::configuration("macd_fast must be below macd_slow"));
        }
        if ind.ema_fast >= ind.ema_slow {
            return Err(StrategyError::configuration("ema_fast must be below ema_slow"));
        }
        if ind.bb_multiplier < dec!(0) {
            return Err(StrategyError::configuration("bb_multiplier must be non-negative"));
        }
        if ind.sr_cluster_threshold < dec!(0) {
            return Err(StrategyError::configuration(
                "sr_cluster_threshold must be non-negative",
            ));
        }

        let t = &self.thresholds;
        if !(t.rsi_oversold < t.rsi_neutral_low
            && t.rsi_neutral_low <= t.rsi_neutral_high
            && t.rsi_neutral_high < t.rsi_overbought)
        {
            return Err(StrategyError::configuration(
                "RSI thresholds must satisfy oversold < neutral_low <= neutral_high < overbought",
            ));
        }
        if t.bb_lower_zone_pct >= t.bb_upper_zone_pct {
            return Err(StrategyError::configuration(
                "bb_lower_zone_pct must be below bb_upper_zone_pct",
            ));
        }
        if t.sr_proximity <= dec!(0) || t.fib_proximity <= dec!(0) {
            return Err(StrategyError::configuration("proximity thresholds must be positive"));
        }
        if t.volume_low_ratio >= t.volume_spike_ratio {
            return Err(StrategyError::configuration(
                "volume_low_ratio must be below volume_spike_ratio",
            ));
        }

        let d = &self.decision;
        if d.min_confluences == 0 || d.min_confluences > 7 {
            return Err(StrategyError::configuration("min_confluences must be between 1 and 7"));
        }
        if d.base_confidence > d.max_confidence || d.max_confidence > 100 {
            return Err(StrategyError::configuration(
                "confidence bounds must satisfy base <= max <= 100",
            ));
        }

        let md = &self.market_data;
        let min_long = ind.min_long_series_len();
        if md.long_limit < min_long {
            return Err(StrategyError::configuration(format!(
                "long_limit {} is below the {} bars the indicators need",
                md.long_limit, min_long
            )));
        }
        if md.short_limit < MIN_SHORT_SERIES_LEN {
            return Err(StrategyError::configuration(format!(
                "short_limit must be at least {}",
                MIN_SHORT_SERIES_LEN
            )));
        }

        Ok(())
    }
}
