//! # Indicators - Pure Technical Analysis Library
//!
//! ## Purpose
//!
//! Stateless indicator functions over chronological OHLCV candle series. Every
//! function takes a slice of closes (or bars) and returns a value; nothing is
//! cached between calls, so the library is safe to call from any number of
//! threads at once.
//!
//! ## Indicators
//!
//! - **Moving averages**: SMA over full trailing windows, EMA seeded with the
//!   first value (same length as the input, no warm-up gap)
//! - **Momentum**: RSI with Wilder smoothing, MACD with slow-EMA alignment
//! - **Volatility**: Bollinger Bands (population standard deviation)
//! - **Levels**: Fibonacci retracements, clustered support/resistance
//! - **Price action**: three-candle reversal pattern classification
//!
//! ## Data Model
//!
//! [`CandleSeries`] is the only way the strategy layer receives candles. Its
//! constructor rejects empty input and non-increasing timestamps, so indicator
//! code never has to re-check ordering.
//!
//! ## Example
//!
//! ```rust
//! use indicators::{ema, rsi, DEFAULT_RSI_PERIOD};
//! use rust_decimal_macros::dec;
//!
//! let closes: Vec<_> = (1..=30).map(rust_decimal::Decimal::from).collect();
//! let trend = ema(&closes, 10);
//! assert_eq!(trend.len(), closes.len());
//! assert!(rsi(&closes, DEFAULT_RSI_PERIOD) > dec!(70));
//! ```

pub mod candle;
pub mod error;
pub mod levels;
pub mod momentum;
pub mod moving_average;
pub mod price_action;
pub mod value;
pub mod volatility;

pub use candle::{Bar, CandleSeries};
pub use error::{IndicatorError, Result};
pub use levels::{
    fibonacci_levels, find_support_resistance, relative_distance, FibonacciLevel,
    FibonacciLevels, LevelKind, SrLevel, DEFAULT_CLUSTER_THRESHOLD, FIBONACCI_RATIOS,
};
pub use momentum::{
    macd, rsi, DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW, DEFAULT_RSI_PERIOD,
};
pub use moving_average::{ema, sma};
pub use price_action::{detect_price_action, CandlePattern, PatternStrength, PriceActionResult};
pub use value::{Direction, IndicatorValue, MacdValue};
pub use volatility::{bollinger_bands, BollingerValue, DEFAULT_BB_MULTIPLIER, DEFAULT_BB_PERIOD};

pub use rust_decimal::Decimal;
